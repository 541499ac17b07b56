//! # Centralized Error Handling
//!
//! Application-wide error type [`AppError`] used consistently across all
//! backend modules, following the `thiserror` pattern.
//!
//! ## Error Categories
//!
//! 1. **Client errors** (4xx)
//!    - [`InvalidRequest`](AppError::InvalidRequest) → 400 Bad Request
//!    - [`Unauthorized`](AppError::Unauthorized) → 401 Unauthorized
//!    - [`NotFound`](AppError::NotFound) → 404 Not Found
//!
//! 2. **Server errors** (5xx)
//!    - [`Directory`](AppError::Directory) → 502 Bad Gateway (external
//!      account directory failure)
//!    - [`Config`](AppError::Config) / [`Internal`](AppError::Internal) →
//!      500 Internal Server Error
//!
//! Every error serializes to the HTTP layer as `{"error": ..., "code": ...}`.
//! Internal details are logged, never surfaced to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type covering all error scenarios.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error during startup or environment loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Account directory request failed (network, bad response).
    #[error("Directory error: {0}")]
    Directory(String),

    /// Missing or malformed required field in a request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing or invalid caller identity.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Requested chat/message/user does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error (unexpected failures).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Directory(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-facing error message.
    ///
    /// Internal errors return a generic message to avoid exposing
    /// implementation details.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::Directory(_) => "Account directory unavailable".to_string(),
            AppError::Config(_) | AppError::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

/// Implement Axum's `IntoResponse` for automatic error handling.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.user_message();

        // Full error details go to the server logs only
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => {
                tracing::debug!("Client error: {}", self);
            }
            _ => {
                tracing::error!("Server error: {}", self);
            }
        }

        let error_code = match self {
            AppError::Config(_) => "Config",
            AppError::Directory(_) => "Directory",
            AppError::InvalidRequest(_) => "InvalidRequest",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::NotFound(_) => "NotFound",
            AppError::Internal(_) => "Internal",
        };

        let body = Json(json!({
            "error": message,
            "code": error_code,
        }));

        (status, body).into_response()
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Convert `sqlx::Error` to `AppError`.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Database record not found".to_string()),
            sqlx::Error::Database(db_err) => {
                AppError::Internal(format!("Database error: {}", db_err.message()))
            }
            _ => AppError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert `serde_json::Error` to `AppError`.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidRequest(format!("Malformed JSON payload: {}", err))
    }
}
