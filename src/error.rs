//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Not authorized: {0}")]
    Forbidden(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("Review not found: {0}")]
    ReviewNotFound(String),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("You have already reviewed this book")]
    DuplicateReview,

    // Domain errors
    #[error(transparent)]
    Domain(#[from] crate::domain::DomainError),

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl From<crate::auth::PasswordError> for AppError {
    fn from(e: crate::auth::PasswordError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl AppError {
    /// Map a failed insert onto a uniqueness error when the database reports
    /// a unique constraint violation (Postgres SQLSTATE 23505).
    pub fn on_unique_violation(e: sqlx::Error, conflict: AppError) -> AppError {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.code().as_deref() == Some("23505") {
                return conflict;
            }
        }
        AppError::Database(e)
    }
}

/// Error response body
///
/// Matches the API's uniform envelope: `success` is always false here and the
/// human-readable reason travels in `message`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error_code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            // 400 Bad Request
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            AppError::Domain(_) => (StatusCode::BAD_REQUEST, "validation_error"),

            // 401 Unauthorized
            AppError::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, "unauthenticated"),

            // 403 Forbidden
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),

            // 404 Not Found
            AppError::UserNotFound(_) => (StatusCode::NOT_FOUND, "user_not_found"),
            AppError::BookNotFound(_) => (StatusCode::NOT_FOUND, "book_not_found"),
            AppError::ReviewNotFound(_) => (StatusCode::NOT_FOUND, "review_not_found"),

            // 409 Conflict
            AppError::DuplicateEmail(_) => (StatusCode::CONFLICT, "duplicate_email"),
            AppError::DuplicateReview => (StatusCode::CONFLICT, "duplicate_review"),

            // 500 Internal Server Error
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error")
            }
        };

        // Keep store internals out of client-facing messages
        let message = match &self {
            AppError::Database(_) | AppError::Internal(_) | AppError::Config(_) => {
                "Something went wrong".to_string()
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            success: false,
            message,
            error_code: error_code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
