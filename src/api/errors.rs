//! # API Errors
//!
//! Maps store outcomes and rejected requests to HTTP responses.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is not valid JSON or does not have the expected shape
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Path segment could not be parsed as an id
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) | ApiError::InvalidPath(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Store(err) => match err {
                StoreError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                StoreError::GuestNotFound(_) | StoreError::AccompanistNotFound { .. } => {
                    StatusCode::NOT_FOUND
                }
                StoreError::QuotaExceeded { .. } => StatusCode::BAD_REQUEST,
                StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Offending field, for validation failures
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ApiError::Store(StoreError::Validation { field, .. }) => Some(*field),
            _ => None,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidPath(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        let status = err.status_code();
        // Backend details stay in the log.
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            err.to_string()
        };
        Self {
            error: message,
            code: status.as_u16(),
            field: err.field().map(str::to_string),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from(StoreError::validation("quota", "must not be negative")).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(StoreError::GuestNotFound(1)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(StoreError::AccompanistNotFound {
                guest_id: 1,
                accompanist_id: 2
            })
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(StoreError::QuotaExceeded { guest_id: 1, quota: 0 }).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(StoreError::Database(sqlx::Error::PoolTimedOut)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::InvalidBody("missing field".to_string()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_error_body_carries_field() {
        let err = ApiError::from(StoreError::validation("name", "must not be empty"));
        let body = ErrorResponse::from(&err);
        assert_eq!(body.code, 422);
        assert_eq!(body.field.as_deref(), Some("name"));
        assert_eq!(body.error, "Invalid name: must not be empty");
    }

    #[test]
    fn test_server_errors_are_opaque() {
        let err = ApiError::from(StoreError::Database(sqlx::Error::PoolClosed));
        let body = ErrorResponse::from(&err);
        assert_eq!(body.code, 500);
        assert_eq!(body.error, "Internal server error");
        assert!(body.field.is_none());
    }
}
