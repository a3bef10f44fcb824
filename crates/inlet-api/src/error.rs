//! API error taxonomy and HTTP mapping.
//!
//! Codes are stable identifiers clients can match on:
//! - E1001 missing signature, E1002 invalid signature (401)
//! - E1003 invalid payload, E1004 invalid query parameter (422)
//! - E3001 storage fault (500, opaque message)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inlet_core::CoreError;
use serde::Serialize;
use thiserror::Error;

/// Errors returned by handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No signature header on a delivery (E1001).
    #[error("[E1001] Missing signature: X-Signature header required")]
    MissingSignature,

    /// Signature did not match the body (E1002).
    #[error("[E1002] Invalid signature: HMAC validation failed")]
    InvalidSignature,

    /// Body is not a valid message payload (E1003).
    #[error("[E1003] Invalid payload: {0}")]
    Validation(String),

    /// Query parameter out of range or malformed (E1004).
    #[error("[E1004] Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Unexpected persistence failure (E3001).
    #[error("[E3001] Storage error: {0}")]
    Storage(#[source] CoreError),
}

impl ApiError {
    /// Returns the error code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingSignature => "E1001",
            Self::InvalidSignature => "E1002",
            Self::Validation(_) => "E1003",
            Self::InvalidParameter(_) => "E1004",
            Self::Storage(_) => "E3001",
        }
    }

    /// Returns the HTTP status for this error.
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingSignature | Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::Validation(_) | Self::InvalidParameter(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to clients. Storage details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            Self::Storage(_) => "[E3001] Internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidInput(message) => Self::InvalidParameter(message),
            other => Self::Storage(other),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error details including code and message
    pub error: ErrorDetail,
}

/// Detailed error information.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Error code (E1001-E3001)
    pub code: String,
    /// Human-readable error description
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorDetail { code: self.code().to_string(), message: self.public_message() },
        };

        (self.status_code(), Json(body)).into_response()
    }
}
