//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

use crate::extractors::auth::TENANT_HEADER;

/// Logs request method, path, tenant, status, and duration.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let tenant = request
        .headers()
        .get(TENANT_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis() as u64;
    let status = response.status();

    if status.is_server_error() {
        warn!(
            method = %method,
            path = %uri.path(),
            tenant_id = %tenant,
            status = status.as_u16(),
            duration_ms,
            "HTTP request failed"
        );
    } else {
        info!(
            method = %method,
            path = %uri.path(),
            tenant_id = %tenant,
            status = status.as_u16(),
            duration_ms,
            "HTTP request"
        );
    }

    response
}
