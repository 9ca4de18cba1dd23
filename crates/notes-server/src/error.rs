//! API error types with JSON responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use notes_core::StoreError;
use serde::Serialize;

/// Message returned for any unexpected server-side fault.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// API error that can be returned from handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body could not be decoded (400).
    #[error("malformed body: {0}")]
    MalformedBody(String),

    /// Not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    Internal(String),

    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(e) => match e {
                StoreError::NoteNotFound(_) => StatusCode::NOT_FOUND,
                StoreError::IdChangeRejected { .. } => StatusCode::BAD_REQUEST,
            },
        }
    }

    /// Body decoding failures and server faults share the
    /// `{"success": false, ...}` envelope; other rejections carry only a message.
    pub fn body(&self) -> ErrorResponse {
        let success = match self {
            Self::MalformedBody(_) => Some(false),
            _ if self.status_code().is_server_error() => Some(false),
            _ => None,
        };
        ErrorResponse {
            success,
            message: self.message(),
        }
    }

    /// Message shown to the client.
    pub fn message(&self) -> String {
        match self {
            Self::MalformedBody(msg) | Self::NotFound(msg) | Self::Internal(msg) => msg.clone(),
            Self::Store(StoreError::NoteNotFound(_)) => "note not found".to_string(),
            Self::Store(StoreError::IdChangeRejected { .. }) => {
                "Changing 'id' is not allowed".to_string()
            }
        }
    }
}

/// JSON error response body.
///
/// Lookup and validation errors carry only `message`; body decoding
/// failures and server faults add `"success": false`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    /// Body for an unexpected server-side fault.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            success: Some(false),
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        (status, Json(self.body())).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use notes_core::NoteId;

    #[test]
    fn test_store_error_status() {
        let not_found = ApiError::from(StoreError::NoteNotFound(NoteId::from("9")));
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.message(), "note not found");

        let id_change = ApiError::from(StoreError::IdChangeRejected {
            id: NoteId::from("1"),
            attempted: "2".to_string(),
        });
        assert_eq!(id_change.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(id_change.message(), "Changing 'id' is not allowed");
    }

    #[test]
    fn test_client_error_body_has_only_message() {
        let body = ErrorResponse {
            success: None,
            message: "note not found".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "note not found" }));
    }

    #[test]
    fn test_internal_error_body() {
        let json = serde_json::to_value(ErrorResponse::internal(INTERNAL_ERROR_MESSAGE)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": false, "message": "Internal Server Error" })
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = ApiError::MalformedBody("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_body_envelope_per_variant() {
        let malformed = serde_json::to_value(ApiError::MalformedBody("bad json".into()).body());
        assert_eq!(
            malformed.unwrap(),
            serde_json::json!({ "success": false, "message": "bad json" })
        );

        let not_found = ApiError::from(StoreError::NoteNotFound(NoteId::from("2")));
        assert_eq!(
            serde_json::to_value(not_found.body()).unwrap(),
            serde_json::json!({ "message": "note not found" })
        );

        let internal = serde_json::to_value(ApiError::Internal("boom".into()).body());
        assert_eq!(
            internal.unwrap(),
            serde_json::json!({ "success": false, "message": "boom" })
        );
    }
}
