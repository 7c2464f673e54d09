//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

fn describe(result: &Result<bool, filevault_core::AppError>, up: &str) -> String {
    match result {
        Ok(true) => up.to_string(),
        _ => "unavailable".to_string(),
    }
}

/// GET /health
///
/// Returns 503 when either backend is unreachable.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let database = state.metadata.health_check().await;
    let storage = state.objects.health_check().await;

    if let Err(e) = &database {
        warn!(error = %e, "Metadata store health check failed");
    }
    if let Err(e) = &storage {
        warn!(error = %e, "Object store health check failed");
    }

    let healthy = matches!(database, Ok(true)) && matches!(storage, Ok(true));
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ApiResponse::ok(HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: describe(&database, "connected"),
            storage: describe(&storage, "available"),
            storage_provider: state.objects.provider_type().to_string(),
        })),
    )
}
