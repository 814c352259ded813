//! Relay error types with client message and HTTP status code mapping.
//!
//! [`RelayError`] is the central error type for the relay. Per-message
//! variants are reported to the sender as an `ERROR` frame carrying
//! [`RelayError::client_message`]; the HTTP surface (`/health`) renders
//! them as a structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Structured JSON error response body.
///
/// All HTTP error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 3001,
///     "message": "persistence error: pool timed out while waiting for an open connection"
///   }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Relay error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category    | HTTP Status               |
/// |-----------|-------------|---------------------------|
/// | 1000–1999 | Message     | 400 Bad Request           |
/// | 3000–3999 | Server      | 503 Service Unavailable   |
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Inbound payload is not syntactically valid JSON.
    #[error("invalid message format: {0}")]
    InvalidMessage(#[from] serde_json::Error),

    /// Inbound binary frame is not valid UTF-8.
    #[error("invalid message format: binary frame is not valid UTF-8")]
    NonUtf8Frame,

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),
}

impl From<sqlx::Error> for RelayError {
    fn from(err: sqlx::Error) -> Self {
        Self::PersistenceError(err.to_string())
    }
}

impl RelayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidMessage(_) => 1001,
            Self::NonUtf8Frame => 1002,
            Self::PersistenceError(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidMessage(_) | Self::NonUtf8Frame => StatusCode::BAD_REQUEST,
            Self::PersistenceError(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Returns the text sent to a WebSocket client in an `ERROR` frame.
    ///
    /// Never includes parser or database details.
    #[must_use]
    pub const fn client_message(&self) -> &'static str {
        match self {
            Self::InvalidMessage(_) | Self::NonUtf8Frame => "Invalid message format",
            Self::PersistenceError(_) => "Failed to store message",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
