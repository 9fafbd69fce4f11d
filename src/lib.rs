pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod views;

use crate::services::{question_service::QuestionService, session_service::SessionStore};
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use std::time::Duration;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub question_service: QuestionService,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(pool: SqlitePool, session_ttl: Duration) -> Self {
        let question_service = QuestionService::new(pool.clone());
        let sessions = SessionStore::new(session_ttl);

        Self {
            pool,
            question_service,
            sessions,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::quiz::index))
        .route("/question", get(routes::quiz::question_page))
        .route("/answer", post(routes::quiz::submit_answer))
        .route("/results", get(routes::quiz::results))
        .route("/restart", get(routes::quiz::restart))
        .route("/retry-wrong", get(routes::quiz::retry_wrong))
        .route("/health", get(routes::health::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
