//! HTTP front door: route registration and request/response shapes.
//!
//! Thin by design. All invariants live in the memory service; this layer
//! translates errors into status codes and nothing more.

pub mod chat;
pub mod memories;
pub mod profile;
pub mod server;
pub mod state;

pub use server::{router, start_http_server};
pub use state::ApiState;

use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

/// Standard error body: `{"error": "..."}`.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Map a save failure onto a status code: bad input is the caller's fault,
/// a retryable dependency outage is a bad gateway, the rest is on us.
pub(crate) fn save_error_status(error: &crate::error::SaveError) -> StatusCode {
    if matches!(error, crate::error::SaveError::InvalidText(_)) {
        StatusCode::BAD_REQUEST
    } else if error.is_retryable() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

pub(crate) fn search_error_status(error: &crate::error::SearchError) -> StatusCode {
    if matches!(error, crate::error::SearchError::InvalidQuery(_)) {
        StatusCode::BAD_REQUEST
    } else if error.is_retryable() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
