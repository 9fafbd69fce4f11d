use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.question_service.count().await {
        Ok(questions) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "questions": questions,
                "active_sessions": state.sessions.len(),
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "health check could not reach the database");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}
