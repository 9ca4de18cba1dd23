//! Route definitions for the HTTP API.

pub mod health;
pub mod notes;

use axum::{Router, http::Uri};

use crate::error::ApiError;
use crate::state::AppState;

/// Build the complete router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(notes::routes())
        .fallback(route_not_found)
        .with_state(state)
}

/// Fallback for paths no route matches.
async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Route {} not found", uri.path()))
}
