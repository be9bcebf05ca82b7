//! Error types for the signup service.

use account_store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Signup error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The email is already taken. Deliberately carries no detail.
    #[error("Account already exists")]
    Conflict,

    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl AuthError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        AuthError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AuthError::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            AuthError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AuthError::InvalidToken(_) => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            AuthError::StorageUnavailable(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
            }
            AuthError::Hashing(_) | AuthError::Signing(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        // Server-side failures are logged in full but reported generically.
        let message = if status.is_server_error() {
            error!(code, "Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(_) => AuthError::Conflict,
            other => AuthError::StorageUnavailable(other.to_string()),
        }
    }
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AuthError::Hashing(e.to_string())
    }
}
