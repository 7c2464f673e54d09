//! File placement: move, duplicate, patch, delete and restore.
//!
//! A file's object key is derived from its folder path, id and name. Every
//! operation that changes the folder or the name relocates the object
//! first and persists the record last. There is no transaction spanning
//! both stores: a failed record write after a relocation is logged and
//! surfaced, and the new object stays where it is.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use filevault_core::error::AppError;
use filevault_core::path;
use filevault_core::result::AppResult;
use filevault_core::traits::storage::ObjectStore;
use filevault_core::types::{BucketId, FileId, FolderId};
use filevault_database::repositories::{BucketRepository, FileRepository, FolderRepository};
use filevault_entity::File;

use crate::context::RequestContext;
use crate::file::persist;
use crate::file::query::{FileListing, FileQuery};
use crate::file::relocation::Relocator;
use crate::lookup;
use crate::validation::{ensure, validate_file_name};

/// Manages placement of existing files.
#[derive(Debug, Clone)]
pub struct FileService {
    /// File repository.
    files: Arc<dyn FileRepository>,
    /// Folder repository.
    folders: Arc<dyn FolderRepository>,
    /// Bucket repository.
    buckets: Arc<dyn BucketRepository>,
    /// Object store.
    objects: Arc<dyn ObjectStore>,
    /// Object relocation helper.
    relocator: Relocator,
}

/// Request to duplicate a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DuplicateFileRequest {
    /// Destination folder; the bucket root when `None`.
    pub target_folder_id: Option<FolderId>,
    /// Name of the copy; `"{stem} - Copy{ext}"` when `None`.
    pub new_name: Option<String>,
}

/// Partial update of a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFileRequest {
    /// New name, sanitized before use.
    pub name: Option<String>,
    /// New folder.
    pub folder_id: Option<FolderId>,
    /// New visibility.
    pub is_public: Option<bool>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        files: Arc<dyn FileRepository>,
        folders: Arc<dyn FolderRepository>,
        buckets: Arc<dyn BucketRepository>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            relocator: Relocator::new(Arc::clone(&objects)),
            files,
            folders,
            buckets,
            objects,
        }
    }

    /// Gets an active file by ID.
    pub async fn get_file(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<File> {
        lookup::active_file(ctx, self.files.as_ref(), file_id).await
    }

    /// Lists the active files of a folder, by name.
    pub async fn list_files(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<Vec<File>> {
        lookup::active_folder(ctx, self.folders.as_ref(), folder_id).await?;

        let mut files: Vec<File> = ctx
            .guard(self.files.find_by_folder(folder_id))
            .await?
            .into_iter()
            .filter(|f| f.is_active() && f.tenant_id == ctx.tenant_id)
            .collect();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    /// Lists the active files placed at the root of a bucket, newest first.
    pub async fn list_root_files(
        &self,
        ctx: &RequestContext,
        bucket_id: BucketId,
    ) -> AppResult<Vec<File>> {
        lookup::owned_bucket(ctx, self.buckets.as_ref(), bucket_id).await?;

        let mut files: Vec<File> = ctx
            .guard(self.files.find_by_bucket(bucket_id))
            .await?
            .into_iter()
            .filter(|f| f.is_active() && f.tenant_id == ctx.tenant_id && f.folder_id.is_none())
            .collect();
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    /// Lists every active file of a bucket, grouped by folder location and
    /// then by name.
    pub async fn list_bucket_files(
        &self,
        ctx: &RequestContext,
        bucket_id: BucketId,
    ) -> AppResult<Vec<File>> {
        lookup::owned_bucket(ctx, self.buckets.as_ref(), bucket_id).await?;

        let mut files: Vec<File> = ctx
            .guard(self.files.find_by_bucket(bucket_id))
            .await?
            .into_iter()
            .filter(|f| f.is_active() && f.tenant_id == ctx.tenant_id)
            .collect();
        files.sort_by(|a, b| {
            a.folder_path()
                .unwrap_or("")
                .cmp(b.folder_path().unwrap_or(""))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(files)
    }

    /// Lists the caller's active files across all buckets, filtered, ordered
    /// and paged by `query`.
    pub async fn list_tenant_files(
        &self,
        ctx: &RequestContext,
        query: &FileQuery,
    ) -> AppResult<FileListing> {
        if let (Some(min), Some(max)) = (query.min_size, query.max_size) {
            if min > max {
                return Err(AppError::validation("min_size must not exceed max_size"));
            }
        }

        let files = ctx.guard(self.files.find_by_tenant(ctx.tenant_id)).await?;
        let listing = query.apply(files);

        debug!(
            tenant_id = %ctx.tenant_id,
            total = listing.files.total,
            page = listing.files.page,
            "Listed tenant files"
        );
        Ok(listing)
    }

    /// Moves a file into a folder, or to the bucket root with `None`.
    ///
    /// Moving a file to the folder it is already in returns it unchanged
    /// without touching the object store.
    pub async fn move_file(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        new_folder_id: Option<FolderId>,
    ) -> AppResult<File> {
        let mut file = self.get_file(ctx, file_id).await?;

        if new_folder_id == file.folder_id {
            debug!(file_id = %file_id, "File already in requested folder");
            return Ok(file);
        }

        file.folder_path = match new_folder_id {
            Some(folder_id) => Some(
                lookup::placement_target(ctx, self.folders.as_ref(), file.bucket_id, folder_id)
                    .await?
                    .full_location(),
            ),
            None => None,
        };
        file.folder_id = new_folder_id;

        let previous_key = file.object_key.clone();
        let relocated = self.settle_key(ctx, &mut file, &previous_key, None).await?;

        file.touch();
        persist(ctx, self.files.as_ref(), &file, relocated).await?;

        info!(
            tenant_id = %ctx.tenant_id,
            user_id = %ctx.user_id,
            file_id = %file.id,
            folder_id = ?file.folder_id,
            object_key = %file.object_key,
            "File moved"
        );
        Ok(file)
    }

    /// Copies a file's object and record under a new id.
    ///
    /// The copy is fully independent of its source.
    pub async fn duplicate_file(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        req: DuplicateFileRequest,
    ) -> AppResult<File> {
        let source = self.get_file(ctx, file_id).await?;

        if let Some(name) = &req.new_name {
            ensure(validate_file_name(name))?;
        }

        let folder_path = match req.target_folder_id {
            Some(folder_id) => Some(
                lookup::placement_target(ctx, self.folders.as_ref(), source.bucket_id, folder_id)
                    .await?
                    .full_location(),
            ),
            None => None,
        };

        let container = self.container(ctx, source.bucket_id).await?;
        let stream = self
            .relocator
            .open(ctx, &container, &source.object_key)
            .await?;

        let id = FileId::new();
        let name = path::sanitize_file_name(&path::duplicate_name(
            &source.name,
            req.new_name.as_deref().map(str::trim),
        ));
        let object_key = path::build_object_key(folder_path.as_deref(), id, &name);

        let written = ctx
            .guard(self.objects.put_stream(
                &container,
                &object_key,
                stream,
                &source.content_type,
                source.is_public,
            ))
            .await?;

        let now = Utc::now();
        let copy = File {
            id,
            tenant_id: source.tenant_id,
            bucket_id: source.bucket_id,
            folder_id: req.target_folder_id,
            folder_path,
            name,
            public_url: source
                .is_public
                .then(|| self.objects.public_url(&container, &object_key)),
            object_key,
            content_type: source.content_type.clone(),
            size_bytes: i64::try_from(written).unwrap_or(source.size_bytes),
            is_public: source.is_public,
            is_deleted: false,
            uploaded_by: ctx.user_id,
            created_at: now,
            updated_at: now,
        };
        persist(ctx, self.files.as_ref(), &copy, true).await?;

        info!(
            tenant_id = %ctx.tenant_id,
            user_id = %ctx.user_id,
            source_id = %source.id,
            file_id = %copy.id,
            object_key = %copy.object_key,
            "File duplicated"
        );
        Ok(copy)
    }

    /// Renames, re-folders and/or changes the visibility of a file.
    ///
    /// Visibility is applied to the object at its current key before any
    /// relocation; the relocated object carries the new visibility.
    pub async fn update_file(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        req: UpdateFileRequest,
    ) -> AppResult<File> {
        let mut file = self.get_file(ctx, file_id).await?;
        let original_key = file.object_key.clone();
        let mut needs_relocation = false;

        if let Some(name) = req.name {
            ensure(validate_file_name(&name))?;
            let name = path::sanitize_file_name(name.trim());
            if name != file.name {
                file.name = name;
                needs_relocation = true;
            }
        }

        if let Some(folder_id) = req.folder_id {
            if file.folder_id != Some(folder_id) {
                let target =
                    lookup::placement_target(ctx, self.folders.as_ref(), file.bucket_id, folder_id)
                        .await?;
                file.folder_id = Some(folder_id);
                file.folder_path = Some(target.full_location());
                needs_relocation = true;
            }
        }

        let mut container = None;
        if let Some(is_public) = req.is_public {
            if is_public != file.is_public {
                let name = self.container(ctx, file.bucket_id).await?;
                ctx.guard(self.objects.set_visibility(&name, &original_key, is_public))
                    .await?;
                file.is_public = is_public;
                file.public_url = is_public.then(|| self.objects.public_url(&name, &original_key));
                container = Some(name);
            }
        }

        let relocated = if needs_relocation {
            self.settle_key(ctx, &mut file, &original_key, container)
                .await?
        } else {
            false
        };

        file.touch();
        persist(ctx, self.files.as_ref(), &file, relocated).await?;

        info!(
            tenant_id = %ctx.tenant_id,
            user_id = %ctx.user_id,
            file_id = %file.id,
            name = %file.name,
            is_public = file.is_public,
            relocated,
            "File updated"
        );
        Ok(file)
    }

    /// Soft-deletes a file, or with `hard` removes its object and record.
    ///
    /// A hard delete removes the record even when the object delete fails.
    pub async fn delete_file(&self, ctx: &RequestContext, file_id: FileId, hard: bool) -> AppResult<()> {
        let mut file = self.get_file(ctx, file_id).await?;

        if hard {
            let container = self.container(ctx, file.bucket_id).await?;
            self.relocator
                .remove_best_effort(ctx, &container, &file.object_key)
                .await;
            ctx.guard(self.files.delete(file_id)).await?;
            info!(
                tenant_id = %ctx.tenant_id,
                user_id = %ctx.user_id,
                file_id = %file_id,
                "File permanently deleted"
            );
        } else {
            file.is_deleted = true;
            file.touch();
            ctx.guard(self.files.save(&file)).await?;
            info!(
                tenant_id = %ctx.tenant_id,
                user_id = %ctx.user_id,
                file_id = %file_id,
                "File soft deleted"
            );
        }
        Ok(())
    }

    /// Clears the soft-delete flag of a file.
    pub async fn restore_file(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<File> {
        let mut file = lookup::any_file(ctx, self.files.as_ref(), file_id).await?;

        if file.is_active() {
            warn!(tenant_id = %ctx.tenant_id, file_id = %file_id, "Restore of active file");
            return Err(AppError::conflict("File is not deleted"));
        }

        file.is_deleted = false;
        file.touch();
        ctx.guard(self.files.save(&file)).await?;

        info!(
            tenant_id = %ctx.tenant_id,
            user_id = %ctx.user_id,
            file_id = %file_id,
            "File restored"
        );
        Ok(file)
    }

    /// Container name of a bucket.
    async fn container(&self, ctx: &RequestContext, bucket_id: BucketId) -> AppResult<String> {
        lookup::owned_bucket(ctx, self.buckets.as_ref(), bucket_id)
            .await
            .map(|bucket| bucket.name)
    }

    /// Bring the object in line with the file's current folder path and
    /// name. Returns whether the object was relocated.
    async fn settle_key(
        &self,
        ctx: &RequestContext,
        file: &mut File,
        previous_key: &str,
        container: Option<String>,
    ) -> AppResult<bool> {
        let new_key = file.expected_key();
        if new_key == previous_key {
            return Ok(false);
        }

        let container = match container {
            Some(name) => name,
            None => self.container(ctx, file.bucket_id).await?,
        };
        self.relocator
            .relocate(
                ctx,
                &container,
                previous_key,
                &new_key,
                &file.content_type,
                file.is_public,
            )
            .await?;

        file.public_url = file
            .is_public
            .then(|| self.objects.public_url(&container, &new_key));
        file.object_key = new_key;
        Ok(true)
    }
}
