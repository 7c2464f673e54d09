//! File handlers: upload, placement, download.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use bytes::Bytes;
use validator::Validate;

use filevault_core::error::AppError;
use filevault_core::types::{BucketId, FileId, FolderId};
use filevault_entity::{DownloadLink, File};
use filevault_service::file::{FileListing, FileQuery, UploadRequest};

use crate::dto::request::{DeleteFileParams, DuplicateFileBody, MoveFileBody, UpdateFileBody};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::Caller;
use crate::state::AppState;

async fn text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::validation(format!("Read error: {e}")))
}

/// GET /api/files
///
/// The caller's files across buckets. Query parameters: `page`, `limit`,
/// `sort_by` (`name`, `size`, `content_type`, `created_at`), `order`,
/// `folder_id`, `extension`, `search`, `min_size`, `max_size`,
/// `from_date`, `to_date`.
pub async fn list_tenant_files(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<FileQuery>,
) -> Result<Json<ApiResponse<FileListing>>, ApiError> {
    let listing = state.file_service.list_tenant_files(&caller, &query).await?;
    Ok(Json(ApiResponse::ok(listing)))
}

/// POST /api/files (multipart)
///
/// Fields: `bucket_id`, optional `folder_id`, optional `is_public`, and
/// `file`.
pub async fn upload_file(
    State(state): State<AppState>,
    caller: Caller,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<File>>), ApiError> {
    let mut bucket_id: Option<BucketId> = None;
    let mut folder_id: Option<FolderId> = None;
    let mut is_public = false;
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "bucket_id" => {
                let text = text_field(field).await?;
                bucket_id = Some(
                    text.trim()
                        .parse()
                        .map_err(|_| AppError::validation("Invalid bucket_id"))?,
                );
            }
            "folder_id" => {
                let text = text_field(field).await?;
                if !text.trim().is_empty() {
                    folder_id = Some(
                        text.trim()
                            .parse()
                            .map_err(|_| AppError::validation("Invalid folder_id"))?,
                    );
                }
            }
            "is_public" => {
                let text = text_field(field).await?;
                is_public = text
                    .trim()
                    .parse()
                    .map_err(|_| AppError::validation("Invalid is_public"))?;
            }
            "file" => {
                file_name = field.file_name().map(String::from);
                content_type = field.content_type().map(String::from);
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let bucket_id = bucket_id.ok_or_else(|| AppError::validation("bucket_id is required"))?;
    let file_name = file_name.ok_or_else(|| AppError::validation("file is required"))?;
    let data = data.ok_or_else(|| AppError::validation("file data is required"))?;

    let file = state
        .upload_service
        .upload(
            &caller,
            UploadRequest {
                bucket_id,
                folder_id,
                file_name,
                content_type,
                data,
                is_public,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(file))))
}

/// GET /api/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<FileId>,
) -> Result<Json<ApiResponse<File>>, ApiError> {
    let file = state.file_service.get_file(&caller, id).await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// PATCH /api/files/{id}
pub async fn update_file(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<FileId>,
    Json(body): Json<UpdateFileBody>,
) -> Result<Json<ApiResponse<File>>, ApiError> {
    body.validate()?;
    let file = state
        .file_service
        .update_file(&caller, id, body.into())
        .await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// DELETE /api/files/{id}?hard=
pub async fn delete_file(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<FileId>,
    Query(params): Query<DeleteFileParams>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.file_service.delete_file(&caller, id, params.hard).await?;
    let message = if params.hard {
        "File permanently deleted"
    } else {
        "File deleted"
    };
    Ok(Json(ApiResponse::ok(MessageResponse::new(message))))
}

/// POST /api/files/{id}/move
pub async fn move_file(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<FileId>,
    Json(body): Json<MoveFileBody>,
) -> Result<Json<ApiResponse<File>>, ApiError> {
    let file = state
        .file_service
        .move_file(&caller, id, body.folder_id)
        .await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// POST /api/files/{id}/duplicate
pub async fn duplicate_file(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<FileId>,
    Json(body): Json<DuplicateFileBody>,
) -> Result<(StatusCode, Json<ApiResponse<File>>), ApiError> {
    body.validate()?;
    let copy = state
        .file_service
        .duplicate_file(&caller, id, body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(copy))))
}

/// POST /api/files/{id}/restore
pub async fn restore_file(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<FileId>,
) -> Result<Json<ApiResponse<File>>, ApiError> {
    let file = state.file_service.restore_file(&caller, id).await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// GET /api/files/{id}/download
///
/// Streams the object body.
pub async fn download_file(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<FileId>,
) -> Result<Response, ApiError> {
    let result = state.download_service.download(&caller, id).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, result.file.content_type.as_str())
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                result.file.name.replace('"', "")
            ),
        )
        .header(header::CONTENT_LENGTH, result.file.size_bytes.max(0).to_string())
        .body(Body::from_stream(result.stream))
        .map_err(|e| ApiError(AppError::internal(format!("Response build failed: {e}"))))
}

/// GET /api/files/{id}/download-url
pub async fn download_url(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<FileId>,
) -> Result<Json<ApiResponse<DownloadLink>>, ApiError> {
    let link = state.download_service.download_url(&caller, id).await?;
    Ok(Json(ApiResponse::ok(link)))
}
