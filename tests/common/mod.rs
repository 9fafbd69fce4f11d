#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use mcq_quiz::database::pool::{create_memory_pool, run_migrations};
use mcq_quiz::dto::generation_dto::{GeneratedOption, GeneratedQuestion};
use mcq_quiz::services::question_service::QuestionService;
use mcq_quiz::AppState;

pub async fn setup_app() -> (Router, QuestionService) {
    let pool = create_memory_pool().await.expect("pool");
    run_migrations(&pool).await.expect("migrations");

    let state = AppState::new(pool, Duration::from_secs(3600));
    let questions = state.question_service.clone();
    (mcq_quiz::router(state), questions)
}

/// `n` four-option questions; the correct option of question `i` is `Answer {i}`.
pub fn sample_questions(n: usize) -> Vec<GeneratedQuestion> {
    (0..n)
        .map(|i| GeneratedQuestion {
            text: format!("Question number {}?", i + 1),
            options: vec![
                GeneratedOption {
                    text: format!("Distractor A{}", i + 1),
                    is_correct: false,
                },
                GeneratedOption {
                    text: format!("Answer {}", i + 1),
                    is_correct: true,
                },
                GeneratedOption {
                    text: format!("Distractor B{}", i + 1),
                    is_correct: false,
                },
                GeneratedOption {
                    text: format!("Distractor C{}", i + 1),
                    is_correct: false,
                },
            ],
        })
        .collect()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_answer(cookie: &str, question_id: i64, option_id: i64) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/answer")
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!(
            "question_id={}&option_id={}",
            question_id, option_id
        )))
        .unwrap()
}

/// `name=value` pair of the session cookie set by the response, if any.
pub fn session_cookie(resp: &Response<Body>) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("mcq_session=") && !v.starts_with("mcq_session=;"))
        .and_then(|v| v.split(';').next())
        .map(|v| v.to_string())
}

pub fn location(resp: &Response<Body>) -> Option<String> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

pub async fn body_text(resp: Response<Body>) -> String {
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Question id carried by the hidden field of a rendered question page.
pub fn shown_question_id(html: &str) -> i64 {
    let marker = r#"name="question_id" value=""#;
    let start = html.find(marker).expect("question id field") + marker.len();
    let end = start + html[start..].find('"').unwrap();
    html[start..end].parse().unwrap()
}
