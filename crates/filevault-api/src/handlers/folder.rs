//! Folder CRUD, move and tree handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use validator::Validate;

use filevault_core::types::FolderId;
use filevault_entity::{File, Folder, FolderDetail, FolderMove};

use crate::dto::request::{CreateFolderBody, MoveFolderBody, TreeParams, UpdateFolderBody};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::Caller;
use crate::state::AppState;

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    caller: Caller,
    Json(body): Json<CreateFolderBody>,
) -> Result<(StatusCode, Json<ApiResponse<Folder>>), ApiError> {
    body.validate()?;
    let folder = state
        .folder_service
        .create_folder(&caller, body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(folder))))
}

/// GET /api/folders/tree?parent_id=&depth=&include_empty=
pub async fn list_tree(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<TreeParams>,
) -> Result<Json<ApiResponse<Vec<FolderDetail>>>, ApiError> {
    let tree = state.tree_service.list_tree(&caller, params.into()).await?;
    Ok(Json(ApiResponse::ok(tree)))
}

/// GET /api/folders/{id}
pub async fn get_folder(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<FolderId>,
) -> Result<Json<ApiResponse<Folder>>, ApiError> {
    let folder = state.folder_service.get_folder(&caller, id).await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// PATCH /api/folders/{id}
pub async fn update_folder(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<FolderId>,
    Json(body): Json<UpdateFolderBody>,
) -> Result<Json<ApiResponse<Folder>>, ApiError> {
    body.validate()?;
    let folder = state
        .folder_service
        .update_folder(&caller, id, body.into())
        .await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// POST /api/folders/{id}/move
pub async fn move_folder(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<FolderId>,
    Json(body): Json<MoveFolderBody>,
) -> Result<Json<ApiResponse<FolderMove>>, ApiError> {
    let moved = state
        .folder_service
        .move_folder(&caller, id, body.parent_id)
        .await?;
    Ok(Json(ApiResponse::ok(moved)))
}

/// DELETE /api/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<FolderId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.folder_service.delete_folder(&caller, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Folder deleted"))))
}

/// GET /api/folders/{id}/children
pub async fn list_children(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<FolderId>,
) -> Result<Json<ApiResponse<Vec<Folder>>>, ApiError> {
    let children = state.folder_service.list_children(&caller, id).await?;
    Ok(Json(ApiResponse::ok(children)))
}

/// GET /api/folders/{id}/files
pub async fn list_files(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<FolderId>,
) -> Result<Json<ApiResponse<Vec<File>>>, ApiError> {
    let files = state.file_service.list_files(&caller, id).await?;
    Ok(Json(ApiResponse::ok(files)))
}
