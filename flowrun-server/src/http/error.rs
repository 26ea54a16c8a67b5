//! API error types with IntoResponse
//!
//! Only request problems are errors here. A CLI that fails, times out or
//! cannot be launched is a normal `{"success": false}` response from the
//! route itself.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Flow id that cannot be passed to the CLI safely (400)
    InvalidFlowId { id: String, reason: &'static str },

    /// Malformed request body (400)
    BadRequest { message: String },
}

impl ApiError {
    fn message(&self) -> String {
        match self {
            Self::InvalidFlowId { id, reason } => format!("invalid flow id '{}': {}", id, reason),
            Self::BadRequest { message } => message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidFlowId { .. } | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
        };
        tracing::debug!(status = status.as_u16(), "rejecting request: {}", self.message());

        let body = json!({
            "success": false,
            "error": self.message(),
        });
        (status, Json(body)).into_response()
    }
}
