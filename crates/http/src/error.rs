//! Error handling for the bookshelf HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use uuid::Uuid;

use crate::response::{Envelope, Status};

/// Message returned for every failure the client cannot act on.
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong";

/// Message returned when a request outlives the configured timeout.
pub const TIMEOUT_MESSAGE: &str = "Request timed out";

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("request timed out")]
    Timeout,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest { .. } => "bad_request",
            AppError::NotFound { .. } => "not_found",
            AppError::Timeout => "timeout",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let status = self.status();
        let error_code = self.code();

        let message = match self {
            AppError::BadRequest { message } | AppError::NotFound { message } => {
                tracing::warn!(
                    error_id = %error_id,
                    error_code = %error_code,
                    status_code = %status.as_u16(),
                    %message,
                    "Request failed"
                );
                message
            }
            AppError::Timeout => {
                tracing::warn!(
                    error_id = %error_id,
                    error_code = %error_code,
                    status_code = %status.as_u16(),
                    "Request timed out"
                );
                TIMEOUT_MESSAGE.to_string()
            }
            AppError::Internal(e) => {
                // Internal details stay in the logs.
                tracing::error!(
                    error_id = %error_id,
                    error_code = %error_code,
                    status_code = %status.as_u16(),
                    error = ?e,
                    "Request error"
                );
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        let body: Envelope<()> = Envelope {
            status: Status::Fail,
            message: Some(message),
            data: None,
        };

        (status, Json(body)).into_response()
    }
}
