//! Maintenance handlers.

use axum::Json;
use axum::extract::{Path, State};

use filevault_core::types::BucketId;
use filevault_service::folder::BackfillReport;

use crate::dto::request::BackfillBody;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::Caller;
use crate::state::AppState;

/// POST /api/admin/buckets/{id}/backfill
///
/// Recomputes stale folder paths (and optionally object keys) of a bucket.
pub async fn backfill_paths(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<BucketId>,
    body: Option<Json<BackfillBody>>,
) -> Result<Json<ApiResponse<BackfillReport>>, ApiError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let report = state
        .repair_service
        .backfill(&caller, id, body.relocate_objects)
        .await?;
    Ok(Json(ApiResponse::ok(report)))
}
