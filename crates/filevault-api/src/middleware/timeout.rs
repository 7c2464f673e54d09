//! Per-request time limit.
//!
//! Dropping the timed-out handler future drops its `Caller`, which cancels
//! the request's engine I/O.

use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use filevault_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Fails requests that run longer than `server.request_timeout_seconds`.
pub async fn request_timeout(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let limit = Duration::from_secs(state.config.server.request_timeout_seconds);
    let path = request.uri().path().to_string();

    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(path = %path, limit_secs = limit.as_secs(), "Request timed out");
            ApiError(AppError::cancelled("Request timed out")).into_response()
        }
    }
}
