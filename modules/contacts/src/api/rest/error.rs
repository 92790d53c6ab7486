use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::dto::ErrorResponse;
use crate::domain::error::DomainError;

pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP-facing error: a status code plus the `{success: false, ...}` body.
#[derive(Debug, Clone, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub error: Option<String>,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            error: None,
        }
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// 500 carrying the operation context as `message` and the fault text
    /// as `error`.
    #[must_use]
    pub fn internal(context: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, context).with_error(detail)
    }

    /// Attach the fault text rendered as `error`.
    #[must_use]
    pub fn with_error(mut self, detail: impl Into<String>) -> Self {
        self.error = Some(detail.into());
        self
    }

    /// Uniform envelope for requests that match no route.
    #[must_use]
    pub fn route_not_found() -> Self {
        Self::not_found("Route not found")
    }

    #[must_use]
    pub fn body(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            message: self.message.clone(),
            error: self.error.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = self.body();
        (self.status, Json(body)).into_response()
    }
}

/// Map a domain error to an `ApiError`.
///
/// `context` names the failed operation; it becomes the message of internal
/// errors, e.g. "Error fetching contacts".
#[must_use]
pub fn domain_error_to_api(e: &DomainError, context: &str) -> ApiError {
    match e {
        DomainError::ContactNotFound { .. } => ApiError::not_found("Contact not found"),
        DomainError::MissingParameter { name } => {
            ApiError::bad_request(format!("Please provide a {name} query parameter"))
        }
        DomainError::Internal { message } => {
            tracing::error!(error = ?e, context, "Internal error while handling request");
            ApiError::internal(context, message.clone())
        }
    }
}

/// Attach the operation context to a domain result so `?` yields an `ApiError`.
pub trait WithOperationContext<T> {
    /// # Errors
    /// Returns the mapped `ApiError` when `self` is an error.
    fn context(self, context: &str) -> ApiResult<T>;
}

impl<T> WithOperationContext<T> for Result<T, DomainError> {
    fn context(self, context: &str) -> ApiResult<T> {
        self.map_err(|e| domain_error_to_api(&e, context))
    }
}
