//! HTTP-facing error type.
//!
//! [`AppError`] is what handlers return; it renders as a JSON body
//! `{"error": "<message>", "code": "<code>"}` with the matching status.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::errors::AllocationError;

/// Error body returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// 400 - malformed request or caller contract violation.
    #[error("{message}")]
    Validation { message: String },
    /// 404 - short key never persisted.
    #[error("{message}")]
    NotFound { message: String },
    /// 503 - retriable; the key space was too crowded for this attempt.
    #[error("{message}")]
    Unavailable { message: String },
    /// 504 - the request deadline elapsed.
    #[error("{message}")]
    Timeout { message: String },
    /// 500 - storage or other infrastructure fault.
    #[error("{message}")]
    Internal { message: String },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::Unavailable { .. } => "service_unavailable",
            AppError::Timeout { .. } => "timeout",
            AppError::Internal { .. } => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            code: self.code(),
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<AllocationError> for AppError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::InvalidInput(message) => AppError::bad_request(message),
            AllocationError::NotFound(_) => AppError::not_found("Short link not found"),
            AllocationError::AllocationExhausted { .. } => {
                AppError::unavailable("Service unavailable, please try again later")
            }
            AllocationError::DeadlineExceeded => AppError::timeout("Request deadline exceeded"),
            // Storage details stay in the logs.
            AllocationError::StorageUnavailable(_) => AppError::internal("Internal server error"),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::bad_request(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}
