//! Backend error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Not signed in")]
    NotSignedIn,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("Email is already registered")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let (status, reason) = match &self {
            BackendError::NotSignedIn => (StatusCode::UNAUTHORIZED, self.to_string()),
            BackendError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            BackendError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            BackendError::EmailTaken => (StatusCode::CONFLICT, self.to_string()),
            BackendError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            BackendError::Storage(msg) | BackendError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        // The front end displays `reason` verbatim
        let body = json!({ "success": false, "reason": reason });
        (status, axum::Json(body)).into_response()
    }
}
