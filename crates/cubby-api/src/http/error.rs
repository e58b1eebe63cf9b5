//! Application error type mapping to HTTP status codes.
//!
//! Only the error classes a developer-facing client can act on are
//! mapped here; anything child-facing (quota denial, safety block,
//! upstream failure) degrades to a normal 200 reply in the chat
//! handler instead of reaching this type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use cubby_types::error::ValidationError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Unknown or expired session id.
    SessionNotFound,
    /// Malformed request with a field-level reason.
    Validation(String),
    /// Generic internal error. The message is child-safe; detail goes
    /// to the internal log only.
    Internal,
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::SessionNotFound => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                "Session not found, please start a new session".to_string(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Something went wrong, please try again".to_string(),
            ),
        };

        let body = json!({
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_not_found_is_404() {
        let response = AppError::SessionNotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_is_400() {
        let response = AppError::Validation("age: must be between 3 and 11".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
