//! Record loaders shared by the engines.
//!
//! Each loader applies the same two checks in the same order: a missing or
//! soft-deleted record is `NotFound`, a record of another tenant is
//! `Forbidden`.

use tracing::warn;

use filevault_core::error::AppError;
use filevault_core::result::AppResult;
use filevault_core::types::{BucketId, FileId, FolderId, TenantId};
use filevault_database::repositories::{BucketRepository, FileRepository, FolderRepository};
use filevault_entity::{Bucket, File, Folder};

use crate::context::RequestContext;

pub(crate) fn ensure_tenant(
    ctx: &RequestContext,
    owner: TenantId,
    entity: &str,
    id: impl std::fmt::Display,
) -> AppResult<()> {
    if owner == ctx.tenant_id {
        return Ok(());
    }
    warn!(
        tenant_id = %ctx.tenant_id,
        owner_tenant_id = %owner,
        entity,
        id = %id,
        "Cross-tenant access rejected"
    );
    Err(AppError::forbidden(format!(
        "{entity} {id} belongs to another tenant"
    )))
}

/// Load an active folder of the caller's tenant.
pub(crate) async fn active_folder(
    ctx: &RequestContext,
    folders: &dyn FolderRepository,
    id: FolderId,
) -> AppResult<Folder> {
    let folder = ctx
        .guard(folders.find_by_id(id))
        .await?
        .filter(Folder::is_active)
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
    ensure_tenant(ctx, folder.tenant_id, "Folder", id)?;
    Ok(folder)
}

/// Load a file of the caller's tenant, soft-deleted ones included.
pub(crate) async fn any_file(
    ctx: &RequestContext,
    files: &dyn FileRepository,
    id: FileId,
) -> AppResult<File> {
    let file = ctx
        .guard(files.find_by_id(id))
        .await?
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
    ensure_tenant(ctx, file.tenant_id, "File", id)?;
    Ok(file)
}

/// Load an active file of the caller's tenant.
pub(crate) async fn active_file(
    ctx: &RequestContext,
    files: &dyn FileRepository,
    id: FileId,
) -> AppResult<File> {
    let file = ctx
        .guard(files.find_by_id(id))
        .await?
        .filter(File::is_active)
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
    ensure_tenant(ctx, file.tenant_id, "File", id)?;
    Ok(file)
}

/// Load a bucket of the caller's tenant.
pub(crate) async fn owned_bucket(
    ctx: &RequestContext,
    buckets: &dyn BucketRepository,
    id: BucketId,
) -> AppResult<Bucket> {
    let bucket = ctx
        .guard(buckets.find_by_id(id))
        .await?
        .ok_or_else(|| AppError::not_found(format!("Bucket {id} not found")))?;
    ensure_tenant(ctx, bucket.tenant_id, "Bucket", id)?;
    Ok(bucket)
}

/// Load the folder a file is being placed into and check it shares the
/// file's bucket.
pub(crate) async fn placement_target(
    ctx: &RequestContext,
    folders: &dyn FolderRepository,
    bucket_id: BucketId,
    folder_id: FolderId,
) -> AppResult<Folder> {
    let folder = active_folder(ctx, folders, folder_id).await?;
    if folder.bucket_id != bucket_id {
        warn!(
            folder_id = %folder_id,
            folder_bucket_id = %folder.bucket_id,
            bucket_id = %bucket_id,
            "Target folder is in a different bucket"
        );
        return Err(AppError::conflict(format!(
            "Folder {folder_id} belongs to a different bucket"
        )));
    }
    Ok(folder)
}
