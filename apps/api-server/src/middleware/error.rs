//! Error handling - maps failures to `{message}` responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use blog_core::error::{DomainError, RepoError};
use blog_shared::ErrorResponse;
use thiserror::Error;

/// Application-level error type rendered as a `{message}` JSON body.
///
/// The `Internal` message is what the client sees; the underlying cause is
/// logged where the error is built and never serialized.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Map a failed post operation. Storage faults are logged and answered
    /// with `public_message`; `RepoError::NotFound` from the gateway (row
    /// vanished mid-operation) still maps to 404.
    pub fn from_domain(public_message: &'static str, err: DomainError) -> Self {
        match err {
            DomainError::Validation(e) => AppError::BadRequest(e.to_string()),
            DomainError::NotFound { entity_type, .. } => {
                AppError::NotFound(ErrorResponse::not_found(entity_type).message)
            }
            DomainError::Storage(RepoError::NotFound) => {
                AppError::NotFound(ErrorResponse::not_found("Post").message)
            }
            DomainError::Storage(other) => {
                tracing::error!(error = %other, "{}", public_message);
                AppError::Internal(public_message.to_string())
            }
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::BadRequest(msg) | AppError::NotFound(msg) | AppError::Internal(msg) => msg,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.message()))
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
