//! Greeting and health check endpoints.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Plain-text greeting served at the root path.
pub const GREETING: &str = "Hello, this is the notes API server for a Notes App built with React.";

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Number of notes currently held.
    pub notes: usize,
}

/// GET / - Static greeting.
async fn greeting() -> &'static str {
    GREETING
}

/// GET /health - Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let notes = state.store().await.len();
    Json(HealthResponse {
        status: "ok".to_string(),
        notes,
    })
}

/// Build greeting and health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(greeting))
        .route("/health", get(health_check))
}
