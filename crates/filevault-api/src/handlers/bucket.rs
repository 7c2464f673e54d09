//! Bucket handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use validator::Validate;

use filevault_core::types::BucketId;
use filevault_entity::{Bucket, File, Folder};

use crate::dto::request::CreateBucketBody;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::Caller;
use crate::state::AppState;

/// POST /api/buckets
pub async fn create_bucket(
    State(state): State<AppState>,
    caller: Caller,
    Json(body): Json<CreateBucketBody>,
) -> Result<(StatusCode, Json<ApiResponse<Bucket>>), ApiError> {
    body.validate()?;
    let bucket = state
        .bucket_service
        .create_bucket(&caller, body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(bucket))))
}

/// GET /api/buckets
pub async fn list_buckets(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<ApiResponse<Vec<Bucket>>>, ApiError> {
    let buckets = state.bucket_service.list_buckets(&caller).await?;
    Ok(Json(ApiResponse::ok(buckets)))
}

/// GET /api/buckets/{id}
pub async fn get_bucket(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<BucketId>,
) -> Result<Json<ApiResponse<Bucket>>, ApiError> {
    let bucket = state.bucket_service.get_bucket(&caller, id).await?;
    Ok(Json(ApiResponse::ok(bucket)))
}

/// GET /api/buckets/{id}/folders
pub async fn list_bucket_folders(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<BucketId>,
) -> Result<Json<ApiResponse<Vec<Folder>>>, ApiError> {
    let folders = state.folder_service.list_by_bucket(&caller, id).await?;
    Ok(Json(ApiResponse::ok(folders)))
}

/// GET /api/buckets/{id}/files
///
/// Files placed at the bucket root.
pub async fn list_root_files(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<BucketId>,
) -> Result<Json<ApiResponse<Vec<File>>>, ApiError> {
    let files = state.file_service.list_root_files(&caller, id).await?;
    Ok(Json(ApiResponse::ok(files)))
}

/// GET /api/buckets/{id}/files/all
///
/// Every active file of the bucket, in any folder.
pub async fn list_bucket_files(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<BucketId>,
) -> Result<Json<ApiResponse<Vec<File>>>, ApiError> {
    let files = state.file_service.list_bucket_files(&caller, id).await?;
    Ok(Json(ApiResponse::ok(files)))
}
