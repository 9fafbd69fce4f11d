mod common;

use axum::http::StatusCode;
use common::{
    body_text, get, location, post_answer, sample_questions, session_cookie, setup_app,
    shown_question_id,
};
use tower::ServiceExt;

#[tokio::test]
async fn empty_store_renders_no_questions_page() {
    let (app, _questions) = setup_app().await;

    let resp = app.clone().oneshot(get("/", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(session_cookie(&resp).is_none());
    let html = body_text(resp).await;
    assert!(html.contains("No questions available"));
}

#[tokio::test]
async fn question_page_without_session_redirects_to_start() {
    let (app, _questions) = setup_app().await;

    let resp = app.clone().oneshot(get("/question", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/"));
}

#[tokio::test]
async fn answering_everything_correctly_scores_full_marks() {
    let (app, questions) = setup_app().await;
    questions.insert_batch(&sample_questions(3)).await.unwrap();

    let resp = app.clone().oneshot(get("/", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/question"));
    let cookie = session_cookie(&resp).expect("session cookie");

    let mut seen = Vec::new();
    for number in 1..=3 {
        let resp = app
            .clone()
            .oneshot(get("/question", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_text(resp).await;
        assert!(html.contains(&format!("<strong>{}</strong> of 3", number)));

        let question_id = shown_question_id(&html);
        assert!(!seen.contains(&question_id));
        seen.push(question_id);

        let question = questions.get_with_options(question_id).await.unwrap().unwrap();
        let correct = question.correct_option().unwrap().option_id;

        let resp = app
            .clone()
            .oneshot(post_answer(&cookie, question_id, correct))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_text(resp).await;
        assert!(html.contains("Correct!"));
        if number == 3 {
            assert!(html.contains(r#"href="/results""#));
        } else {
            assert!(html.contains(r#"href="/question""#));
        }
    }

    let resp = app
        .clone()
        .oneshot(get("/question", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(location(&resp).as_deref(), Some("/results"));

    let resp = app
        .clone()
        .oneshot(get("/results", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("3 / 3"));
    assert!(!html.contains("Retry wrong answers"));
}

#[tokio::test]
async fn wrong_answer_reveals_correct_option_and_advances() {
    let (app, questions) = setup_app().await;
    questions.insert_batch(&sample_questions(2)).await.unwrap();

    let resp = app.clone().oneshot(get("/", None)).await.unwrap();
    let cookie = session_cookie(&resp).expect("session cookie");

    let html = body_text(
        app.clone()
            .oneshot(get("/question", Some(&cookie)))
            .await
            .unwrap(),
    )
    .await;
    let first_id = shown_question_id(&html);
    let first = questions.get_with_options(first_id).await.unwrap().unwrap();
    let correct = first.correct_option().unwrap().clone();
    let wrong = first.options.iter().find(|o| !o.is_correct).unwrap().clone();

    let resp = app
        .clone()
        .oneshot(post_answer(&cookie, first_id, wrong.option_id))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Incorrect."));
    assert!(html.contains(&format!(
        r#"Correct answer: <strong class="correct-answer">{}</strong>"#,
        correct.text
    )));
    assert!(html.contains("Score 0"));

    let resp = app
        .clone()
        .oneshot(get("/question", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("<strong>2</strong> of 2"));
    assert_ne!(shown_question_id(&html), first_id);
}

#[tokio::test]
async fn option_from_another_question_is_rejected() {
    let (app, questions) = setup_app().await;
    questions.insert_batch(&sample_questions(2)).await.unwrap();

    let resp = app.clone().oneshot(get("/", None)).await.unwrap();
    let cookie = session_cookie(&resp).expect("session cookie");
    let html = body_text(
        app.clone()
            .oneshot(get("/question", Some(&cookie)))
            .await
            .unwrap(),
    )
    .await;
    let current_id = shown_question_id(&html);

    let all = questions.list_with_options().await.unwrap();
    let other = all.iter().find(|q| q.question_id != current_id).unwrap();

    let resp = app
        .clone()
        .oneshot(post_answer(&cookie, current_id, other.options[0].option_id))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // The rejected answer did not move the session forward.
    let html = body_text(
        app.clone()
            .oneshot(get("/question", Some(&cookie)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(shown_question_id(&html), current_id);
}

#[tokio::test]
async fn repeated_submit_for_answered_question_is_ignored() {
    let (app, questions) = setup_app().await;
    questions.insert_batch(&sample_questions(2)).await.unwrap();

    let resp = app.clone().oneshot(get("/", None)).await.unwrap();
    let cookie = session_cookie(&resp).expect("session cookie");
    let html = body_text(
        app.clone()
            .oneshot(get("/question", Some(&cookie)))
            .await
            .unwrap(),
    )
    .await;
    let question_id = shown_question_id(&html);
    let question = questions.get_with_options(question_id).await.unwrap().unwrap();
    let correct = question.correct_option().unwrap().option_id;

    let resp = app
        .clone()
        .oneshot(post_answer(&cookie, question_id, correct))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(post_answer(&cookie, question_id, correct))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/question"));
}

#[tokio::test]
async fn retry_wrong_replays_only_missed_questions() {
    let (app, questions) = setup_app().await;
    questions.insert_batch(&sample_questions(2)).await.unwrap();

    let resp = app.clone().oneshot(get("/", None)).await.unwrap();
    let cookie = session_cookie(&resp).expect("session cookie");

    let mut missed = None;
    for _ in 0..2 {
        let html = body_text(
            app.clone()
                .oneshot(get("/question", Some(&cookie)))
                .await
                .unwrap(),
        )
        .await;
        let question_id = shown_question_id(&html);
        let question = questions.get_with_options(question_id).await.unwrap().unwrap();

        // Miss the first question shown, get the second right.
        let option = if missed.is_none() {
            missed = Some(question_id);
            question.options.iter().find(|o| !o.is_correct).unwrap().option_id
        } else {
            question.correct_option().unwrap().option_id
        };
        app.clone()
            .oneshot(post_answer(&cookie, question_id, option))
            .await
            .unwrap();
    }

    let html = body_text(
        app.clone()
            .oneshot(get("/results", Some(&cookie)))
            .await
            .unwrap(),
    )
    .await;
    assert!(html.contains("1 / 2"));
    assert!(html.contains("Retry wrong answers"));

    let resp = app
        .clone()
        .oneshot(get("/retry-wrong", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(location(&resp).as_deref(), Some("/question"));
    let retry_cookie = session_cookie(&resp).expect("retry session cookie");

    let html = body_text(
        app.clone()
            .oneshot(get("/question", Some(&retry_cookie)))
            .await
            .unwrap(),
    )
    .await;
    assert!(html.contains("<strong>1</strong> of 1"));
    assert_eq!(Some(shown_question_id(&html)), missed);
}

#[tokio::test]
async fn root_resumes_unfinished_session() {
    let (app, questions) = setup_app().await;
    questions.insert_batch(&sample_questions(2)).await.unwrap();

    let resp = app.clone().oneshot(get("/", None)).await.unwrap();
    let cookie = session_cookie(&resp).expect("session cookie");

    let resp = app.clone().oneshot(get("/", Some(&cookie))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp).as_deref(), Some("/question"));
    assert!(session_cookie(&resp).is_none());
}

#[tokio::test]
async fn health_reports_question_count() {
    let (app, questions) = setup_app().await;
    questions.insert_batch(&sample_questions(4)).await.unwrap();

    let resp = app.clone().oneshot(get("/health", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["questions"], 4);
}
