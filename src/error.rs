//! API error taxonomy.
//!
//! Every handler failure maps to one of these variants; unexpected store
//! failures are logged server-side and collapsed to `Internal` so no
//! detail reaches the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Errors surfaced by the HTTP API
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or missing input (400)
    Validation(&'static str),
    /// Missing/invalid/expired token or bad credentials (401)
    Unauthenticated(&'static str),
    /// Unique-constraint violation (409)
    Conflict(&'static str),
    /// Resource absent or not owned by the caller (404)
    NotFound(&'static str),
    /// Unexpected failure (500), generic message only
    Internal,
}

impl ApiError {
    /// Log an unexpected error and collapse it to a generic 500.
    pub fn internal(err: anyhow::Error) -> Self {
        error!("Unexpected server error: {:#}", err);
        ApiError::Internal
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Server error"),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
