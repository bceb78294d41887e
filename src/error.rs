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
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Unauthorized")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("User not found")]
    UserNotFound(String),

    #[error("{0}")]
    CardNotFound(String),

    #[error("Email is already in use")]
    EmailTaken(String),

    #[error("Card number is already in use")]
    CardNumberTaken(String),

    // Domain validation errors
    #[error(transparent)]
    Amount(#[from] crate::domain::AmountError),

    #[error(transparent)]
    Card(#[from] crate::domain::CardError),

    // Server errors (5xx)
    #[error("Could not allocate a unique card number")]
    CardNumberCollision,

    #[error("Password hashing error")]
    Password(#[from] crate::auth::PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            // 400 Bad Request
            AppError::InvalidArgument(_) => {
                (StatusCode::BAD_REQUEST, "invalid_argument", None)
            }
            AppError::Amount(e) => {
                (StatusCode::BAD_REQUEST, "invalid_amount", Some(e.to_string()))
            }
            AppError::Card(e) => {
                (StatusCode::BAD_REQUEST, "invalid_card_number", Some(e.to_string()))
            }

            // 401 Unauthorized
            AppError::Unauthenticated(reason) => {
                (StatusCode::UNAUTHORIZED, "unauthenticated", Some(reason.clone()))
            }

            // 403 Forbidden
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden", None),

            // 404 Not Found
            AppError::UserNotFound(id) => {
                (StatusCode::NOT_FOUND, "user_not_found", Some(id.clone()))
            }
            AppError::CardNotFound(_) => {
                (StatusCode::NOT_FOUND, "card_not_found", None)
            }

            // 409 Conflict
            AppError::EmailTaken(email) => {
                (StatusCode::CONFLICT, "email_taken", Some(email.clone()))
            }
            AppError::CardNumberTaken(_) => {
                (StatusCode::CONFLICT, "card_number_taken", None)
            }

            // 500 Internal Server Error
            AppError::CardNumberCollision => {
                tracing::error!("card number generation exhausted retry budget");
                (StatusCode::INTERNAL_SERVER_ERROR, "card_number_collision", None)
            }
            AppError::Password(e) => {
                tracing::error!("Password hashing error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error", None)
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
