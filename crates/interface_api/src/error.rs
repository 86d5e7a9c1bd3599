//! API error handling
//!
//! Every failure leaves the API as `{success: false, error}` with one of
//! three statuses. Internal causes are logged here and replaced by a fixed
//! message chosen by the handler.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::any::Any;
use thiserror::Error;
use tracing::{error, warn};

use core_kernel::PortError;

/// Message returned when a handler panics
pub const PANIC_MESSAGE: &str = "Internal server error";

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps a port error, hiding internal causes behind `internal_message`
    pub fn from_port(err: PortError, internal_message: &str) -> Self {
        match err {
            PortError::NotFound { entity_type, .. } => {
                ApiError::NotFound(format!("{} not found", entity_type))
            }
            PortError::Validation { message, .. } | PortError::Conflict { message } => {
                ApiError::BadRequest(message)
            }
            err @ PortError::Internal { .. } => {
                error!(error = %err, "{}", internal_message);
                ApiError::Internal(internal_message.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "rejected request body");
        ApiError::BadRequest("Invalid request body".to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        warn!(error = %rejection.body_text(), "rejected query string");
        ApiError::BadRequest("Invalid query parameters".to_string())
    }
}

/// Renders a caught handler panic as the internal error envelope
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!(panic = detail, "request handler panicked");

    ApiError::Internal(PANIC_MESSAGE.to_string()).into_response()
}
