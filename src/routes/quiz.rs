use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::dto::quiz_dto::AnswerForm;
use crate::error::{Error, Result};
use crate::models::session::{AnswerOutcome, QuizSession};
use crate::views::quiz::{self as quiz_views, FeedbackData, QuestionData, ResultRow, ResultsData};
use crate::AppState;

pub const SESSION_COOKIE: &str = "mcq_session";

fn session_cookie(id: Uuid) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn current_session(state: &AppState, jar: &CookieJar) -> Option<(Uuid, QuizSession)> {
    let id = jar
        .get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())?;
    state.sessions.get(id).map(|session| (id, session))
}

async fn start_new(state: &AppState, jar: CookieJar) -> Result<Response> {
    if let Some((old_id, _)) = current_session(state, &jar) {
        state.sessions.remove(old_id);
    }

    let question_ids = state.question_service.question_ids().await?;
    if question_ids.is_empty() {
        tracing::info!("quiz requested but no questions are stored");
        let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
        return Ok((jar, quiz_views::no_questions()).into_response());
    }

    let total = question_ids.len();
    let id = state.sessions.start(question_ids);
    tracing::info!(session_id = %id, total, "quiz started");
    Ok((jar.add(session_cookie(id)), Redirect::to("/question")).into_response())
}

/// Continues an unfinished attempt, otherwise starts a new one.
pub async fn index(State(state): State<AppState>, jar: CookieJar) -> Result<Response> {
    if let Some((_, session)) = current_session(&state, &jar) {
        if !session.is_finished() {
            return Ok(Redirect::to("/question").into_response());
        }
    }
    start_new(&state, jar).await
}

pub async fn restart(State(state): State<AppState>, jar: CookieJar) -> Result<Response> {
    start_new(&state, jar).await
}

pub async fn question_page(State(state): State<AppState>, jar: CookieJar) -> Result<Response> {
    let Some((_, session)) = current_session(&state, &jar) else {
        return Ok(Redirect::to("/").into_response());
    };
    let Some(question_id) = session.current_question_id() else {
        return Ok(Redirect::to("/results").into_response());
    };

    let Some(question) = state.question_service.get_with_options(question_id).await? else {
        tracing::warn!(question_id, "question disappeared from the store, restarting quiz");
        return Ok(Redirect::to("/restart").into_response());
    };

    Ok(quiz_views::question(QuestionData {
        question,
        number: session.current_index + 1,
        total: session.total(),
    })
    .into_response())
}

pub async fn submit_answer(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AnswerForm>,
) -> Result<Response> {
    let Some((id, session)) = current_session(&state, &jar) else {
        return Ok(Redirect::to("/").into_response());
    };
    let Some(option_id) = form.option_id else {
        return Ok(Redirect::to("/question").into_response());
    };
    if session.current_question_id() != Some(form.question_id) {
        let target = if session.is_finished() { "/results" } else { "/question" };
        return Ok(Redirect::to(target).into_response());
    }

    let question = state
        .question_service
        .get_with_options(form.question_id)
        .await?
        .ok_or_else(|| Error::BadRequest(format!("question {} no longer exists", form.question_id)))?;
    let is_correct = question
        .option(option_id)
        .map(|o| o.is_correct)
        .ok_or_else(|| {
            Error::BadRequest(format!(
                "option {} does not belong to question {}",
                option_id, form.question_id
            ))
        })?;

    let Some((outcome, session)) = state.sessions.answer(id, form.question_id, option_id, is_correct)
    else {
        return Ok(Redirect::to("/").into_response());
    };
    if outcome == AnswerOutcome::Stale {
        return Ok(Redirect::to("/question").into_response());
    }

    tracing::info!(
        session_id = %id,
        question_id = form.question_id,
        correct = is_correct,
        score = session.score,
        "answer recorded"
    );

    Ok(quiz_views::feedback(FeedbackData {
        question,
        selected_option_id: option_id,
        number: session.current_index,
        total: session.total(),
        score: session.score,
        finished: session.is_finished(),
    })
    .into_response())
}

pub async fn results(State(state): State<AppState>, jar: CookieJar) -> Result<Response> {
    let Some((_, session)) = current_session(&state, &jar) else {
        return Ok(Redirect::to("/").into_response());
    };
    if !session.is_finished() {
        return Ok(Redirect::to("/question").into_response());
    }

    let questions = state.question_service.list_by_ids(&session.question_ids).await?;
    let rows = questions
        .into_iter()
        .map(|question| {
            let selected = session
                .answers
                .get(&question.question_id)
                .and_then(|option_id| question.option(*option_id).cloned());
            ResultRow { question, selected }
        })
        .collect();

    Ok(quiz_views::results(ResultsData {
        score: session.score,
        total: session.total(),
        rows,
        has_wrong_answers: !session.wrong_question_ids.is_empty(),
    })
    .into_response())
}

pub async fn retry_wrong(State(state): State<AppState>, jar: CookieJar) -> Result<Response> {
    let Some((id, session)) = current_session(&state, &jar) else {
        return Ok(Redirect::to("/").into_response());
    };
    let Some(retry) = session.retry_wrong() else {
        return Ok(Redirect::to("/").into_response());
    };

    state.sessions.remove(id);
    let total = retry.total();
    let new_id = state.sessions.insert(retry);
    tracing::info!(session_id = %new_id, total, "retrying wrong answers");
    Ok((jar.add(session_cookie(new_id)), Redirect::to("/question")).into_response())
}
