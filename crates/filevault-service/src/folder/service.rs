//! Folder hierarchy operations: create, rename, move, delete and lookups.
//!
//! Folders are virtual: none of these operations touch the object store.
//! A folder's `path` is denormalized from its ancestors at create and move
//! time only; renaming or moving a folder leaves the paths of its
//! descendants and files as they were (see
//! [`PathRepairService`](super::PathRepairService) for the explicit fix-up).

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use filevault_core::error::AppError;
use filevault_core::result::AppResult;
use filevault_core::types::{BucketId, FolderId};
use filevault_database::repositories::{BucketRepository, FolderRepository};
use filevault_entity::{Folder, FolderMove};

use crate::context::RequestContext;
use crate::lookup;
use crate::validation::{ensure, validate_folder_name};

/// Manages the folder tree.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Folder repository.
    folders: Arc<dyn FolderRepository>,
    /// Bucket repository.
    buckets: Arc<dyn BucketRepository>,
}

/// Request to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    /// Owning bucket.
    pub bucket_id: BucketId,
    /// Parent folder ID (None for root-level).
    pub parent_id: Option<FolderId>,
    /// Folder name.
    pub name: String,
    /// Public visibility flag.
    #[serde(default)]
    pub is_public: bool,
}

/// Partial update of a folder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFolderRequest {
    /// New name.
    pub name: Option<String>,
    /// New visibility.
    pub is_public: Option<bool>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(folders: Arc<dyn FolderRepository>, buckets: Arc<dyn BucketRepository>) -> Self {
        Self { folders, buckets }
    }

    /// Gets an active folder by ID.
    pub async fn get_folder(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<Folder> {
        lookup::active_folder(ctx, self.folders.as_ref(), folder_id).await
    }

    /// Lists the active folders of a bucket, ordered by location.
    pub async fn list_by_bucket(
        &self,
        ctx: &RequestContext,
        bucket_id: BucketId,
    ) -> AppResult<Vec<Folder>> {
        lookup::owned_bucket(ctx, self.buckets.as_ref(), bucket_id).await?;

        let mut folders: Vec<Folder> = ctx
            .guard(self.folders.find_by_bucket(bucket_id))
            .await?
            .into_iter()
            .filter(|f| f.is_active() && f.tenant_id == ctx.tenant_id)
            .collect();
        folders.sort_by(|a, b| a.full_location().cmp(&b.full_location()));
        Ok(folders)
    }

    /// Lists the active direct children of a folder, ordered by name.
    pub async fn list_children(
        &self,
        ctx: &RequestContext,
        parent_id: FolderId,
    ) -> AppResult<Vec<Folder>> {
        self.get_folder(ctx, parent_id).await?;

        let mut children: Vec<Folder> = ctx
            .guard(self.folders.find_by_parent(parent_id))
            .await?
            .into_iter()
            .filter(|f| f.is_active() && f.tenant_id == ctx.tenant_id)
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    /// Creates a new folder.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> AppResult<Folder> {
        let name = req.name.trim().to_string();
        ensure(validate_folder_name(&name))?;

        let bucket = lookup::owned_bucket(ctx, self.buckets.as_ref(), req.bucket_id).await?;

        let path = match req.parent_id {
            Some(parent_id) => {
                let parent = self.get_folder(ctx, parent_id).await?;
                if parent.bucket_id != bucket.id {
                    warn!(
                        tenant_id = %ctx.tenant_id,
                        parent_id = %parent_id,
                        bucket_id = %bucket.id,
                        "Parent folder is in a different bucket"
                    );
                    return Err(AppError::conflict(
                        "Parent folder belongs to a different bucket",
                    ));
                }
                parent.full_location()
            }
            None => String::new(),
        };

        self.ensure_name_free(ctx, bucket.id, &path, &name, None)
            .await?;

        let folder = Folder::new(
            ctx.tenant_id,
            bucket.id,
            req.parent_id,
            name,
            path,
            req.is_public,
            ctx.user_id,
        );
        ctx.guard(self.folders.save(&folder)).await?;

        info!(
            tenant_id = %ctx.tenant_id,
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            bucket_id = %folder.bucket_id,
            path = %folder.path,
            name = %folder.name,
            "Folder created"
        );

        Ok(folder)
    }

    /// Renames a folder and/or changes its visibility.
    ///
    /// Descendant paths are not recomputed.
    pub async fn update_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        req: UpdateFolderRequest,
    ) -> AppResult<Folder> {
        let mut folder = self.get_folder(ctx, folder_id).await?;

        if let Some(name) = req.name {
            let name = name.trim().to_string();
            ensure(validate_folder_name(&name))?;
            self.ensure_name_free(ctx, folder.bucket_id, &folder.path, &name, Some(folder.id))
                .await?;
            folder.name = name;
        }
        if let Some(is_public) = req.is_public {
            folder.is_public = is_public;
        }

        folder.touch();
        ctx.guard(self.folders.save(&folder)).await?;

        info!(
            tenant_id = %ctx.tenant_id,
            folder_id = %folder.id,
            name = %folder.name,
            is_public = folder.is_public,
            "Folder updated"
        );

        Ok(folder)
    }

    /// Moves a folder under a new parent, or to the root with `None`.
    ///
    /// Moving a folder to the parent it already has returns at once without
    /// writing anything.
    pub async fn move_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        new_parent_id: Option<FolderId>,
    ) -> AppResult<FolderMove> {
        let mut folder = self.get_folder(ctx, folder_id).await?;

        if new_parent_id == folder.parent_id {
            debug!(folder_id = %folder_id, "Folder already under requested parent");
            return Ok(FolderMove {
                folder_id,
                parent_id: folder.parent_id,
                path: folder.breadcrumbs(),
            });
        }

        let new_path = match new_parent_id {
            Some(parent_id) if parent_id == folder_id => {
                warn!(tenant_id = %ctx.tenant_id, folder_id = %folder_id, "Folder moved into itself");
                return Err(AppError::conflict("Cannot move a folder into itself"));
            }
            Some(parent_id) => {
                let target = self.get_folder(ctx, parent_id).await?;
                if target.bucket_id != folder.bucket_id {
                    return Err(AppError::conflict(
                        "Cannot move a folder into a different bucket",
                    ));
                }
                self.ensure_not_descendant(ctx, &folder, &target).await?;
                target.full_location()
            }
            None => String::new(),
        };

        self.ensure_name_free(ctx, folder.bucket_id, &new_path, &folder.name, Some(folder.id))
            .await?;

        let old_path = std::mem::replace(&mut folder.path, new_path);
        folder.parent_id = new_parent_id;
        folder.touch();
        ctx.guard(self.folders.save(&folder)).await?;

        info!(
            tenant_id = %ctx.tenant_id,
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            from = %old_path,
            to = %folder.path,
            "Folder moved"
        );

        Ok(FolderMove {
            folder_id,
            parent_id: folder.parent_id,
            path: folder.breadcrumbs(),
        })
    }

    /// Soft-deletes a folder. Blocked while it has active subfolders; files
    /// inside it do not block deletion.
    pub async fn delete_folder(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<()> {
        let mut folder = self.get_folder(ctx, folder_id).await?;

        let children = ctx.guard(self.folders.find_by_parent(folder_id)).await?;
        let active_children = children.iter().filter(|c| c.is_active()).count();
        if active_children > 0 {
            warn!(
                tenant_id = %ctx.tenant_id,
                folder_id = %folder_id,
                active_children,
                "Folder delete blocked by subfolders"
            );
            return Err(AppError::conflict(
                "Folder has subfolders; delete them first",
            ));
        }

        folder.is_deleted = true;
        folder.touch();
        ctx.guard(self.folders.save(&folder)).await?;

        info!(
            tenant_id = %ctx.tenant_id,
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            "Folder deleted"
        );
        Ok(())
    }

    /// Fail with `Conflict` when an active folder other than `except`
    /// already occupies (bucket, path, name).
    async fn ensure_name_free(
        &self,
        ctx: &RequestContext,
        bucket_id: BucketId,
        path: &str,
        name: &str,
        except: Option<FolderId>,
    ) -> AppResult<()> {
        let existing = ctx
            .guard(self.folders.find_by_location(bucket_id, path, name))
            .await?;
        match existing {
            Some(other) if Some(other.id) != except => {
                warn!(
                    tenant_id = %ctx.tenant_id,
                    bucket_id = %bucket_id,
                    path,
                    name,
                    "Folder name already taken"
                );
                Err(AppError::conflict(format!(
                    "A folder named '{name}' already exists at this location"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Walk the ancestors of `target` and reject the move if `folder` is one
    /// of them.
    async fn ensure_not_descendant(
        &self,
        ctx: &RequestContext,
        folder: &Folder,
        target: &Folder,
    ) -> AppResult<()> {
        let mut seen = HashSet::from([target.id]);
        let mut next = target.parent_id;

        while let Some(ancestor_id) = next {
            if ancestor_id == folder.id {
                warn!(
                    tenant_id = %ctx.tenant_id,
                    folder_id = %folder.id,
                    target_id = %target.id,
                    "Folder moved into its own descendant"
                );
                return Err(AppError::conflict(
                    "Cannot move a folder into one of its own subfolders",
                ));
            }
            if !seen.insert(ancestor_id) {
                warn!(folder_id = %ancestor_id, "Existing cycle in folder ancestry");
                break;
            }
            next = ctx
                .guard(self.folders.find_by_id(ancestor_id))
                .await?
                .and_then(|f| f.parent_id);
        }
        Ok(())
    }
}
