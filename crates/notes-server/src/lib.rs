//! notes-server: HTTP API server for the notes collection
//!
//! This crate provides:
//! - REST endpoints to create, list, patch, replace and delete notes
//! - JSON and URL-encoded form request bodies
//! - JSON error responses with a panic fallback
//!
//! # Architecture
//!
//! The server is built on Axum with a middleware stack for:
//! - Request ID generation and propagation
//! - Request tracing and logging
//! - CORS handling
//! - Panic recovery
//!
//! # Usage
//!
//! ```rust,ignore
//! use notes_server::{config::ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::from_env()?;
//!     run_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod telemetry;

use axum::Router;
use http::HeaderValue;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use notes_core::NotesStore;

use crate::middleware::panic::catch_panic_layer;
use crate::middleware::request_id::{make_request_span, propagate_request_id, request_id_layer};

// Re-exports for convenience
pub use config::{ConfigError, LogFormat, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use extract::NoteBody;
pub use state::AppState;

// Re-export dependent crates
pub use notes_core;

/// Build the application: routes plus the full middleware stack.
pub fn app(state: AppState) -> Result<Router, ConfigError> {
    let allowed_origins = state.config().cors_allowed_origins.clone();
    with_middleware(routes::build_router(state), &allowed_origins)
}

/// Wrap `router` in request ids, tracing, CORS and panic recovery.
pub fn with_middleware(router: Router, allowed_origins: &str) -> Result<Router, ConfigError> {
    let cors = build_cors_layer(allowed_origins)?;

    let middleware = ServiceBuilder::new()
        .layer(request_id_layer())
        .layer(axum::middleware::from_fn(propagate_request_id))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(cors)
        .layer(catch_panic_layer());

    Ok(router.layer(middleware))
}

/// Build CORS layer from configuration.
pub fn build_cors_layer(allowed_origins: &str) -> Result<CorsLayer, ConfigError> {
    let allow_origin = if allowed_origins.trim() == "*" {
        AllowOrigin::any()
    } else {
        // Parse comma-separated origins
        let origins = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<HeaderValue>().map_err(|_| ConfigError::InvalidValue {
                    name: "CORS_ALLOWED_ORIGINS".to_string(),
                    reason: format!("'{}' is not a valid origin", s),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Run the server until Ctrl+C or SIGTERM.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.socket_addr();
    let state = AppState::new(NotesStore::new(), config);
    let app = app(state)?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use serde_json::{Value, json};

    #[test]
    fn test_build_cors_layer() {
        assert!(build_cors_layer("*").is_ok());
        assert!(build_cors_layer("http://localhost:5173").is_ok());
        assert!(build_cors_layer("http://a.example, http://b.example").is_ok());
        assert!(build_cors_layer("bad\norigin").is_err());
    }

    #[test]
    fn test_app_rejects_invalid_origin() {
        let config = ServerConfig {
            cors_allowed_origins: "bad\norigin".to_string(),
            ..ServerConfig::default()
        };
        let state = AppState::new(NotesStore::new(), config);
        assert!(matches!(app(state), Err(ConfigError::InvalidValue { .. })));
    }

    async fn explode() -> &'static str {
        panic!("handler blew up");
    }

    #[tokio::test]
    async fn test_panicking_handler_returns_500_and_server_keeps_serving() {
        let router = Router::new()
            .route("/explode", get(explode))
            .route("/ok", get(|| async { "fine" }));
        let app = with_middleware(router, "*").unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let client = reqwest::Client::new();

        let response = client
            .get(format!("http://{}/explode", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().contains_key("x-request-id"));
        let body: Value = response.json().await.unwrap();
        assert_eq!(
            body,
            json!({ "success": false, "message": "Internal Server Error" })
        );

        let response = client
            .get(format!("http://{}/ok", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "fine");
    }
}
