//! File upload: single request with the full body.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::info;

use filevault_core::config::{KeyLayout, StorageConfig};
use filevault_core::error::AppError;
use filevault_core::path;
use filevault_core::result::AppResult;
use filevault_core::traits::storage::ObjectStore;
use filevault_core::types::{BucketId, FileId, FolderId};
use filevault_database::repositories::{BucketRepository, FileRepository, FolderRepository};
use filevault_entity::File;

use crate::context::RequestContext;
use crate::file::persist;
use crate::lookup;
use crate::validation::{ensure, validate_file_name};

/// Content type recorded when the client sends none.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Handles file uploads.
#[derive(Debug, Clone)]
pub struct UploadService {
    /// File repository.
    files: Arc<dyn FileRepository>,
    /// Folder repository.
    folders: Arc<dyn FolderRepository>,
    /// Bucket repository.
    buckets: Arc<dyn BucketRepository>,
    /// Object store.
    objects: Arc<dyn ObjectStore>,
    /// Storage configuration.
    config: StorageConfig,
}

/// Upload parameters.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Target bucket.
    pub bucket_id: BucketId,
    /// Target folder; the bucket root when `None`.
    pub folder_id: Option<FolderId>,
    /// File name as sent by the client.
    pub file_name: String,
    /// MIME type.
    pub content_type: Option<String>,
    /// File content bytes.
    pub data: Bytes,
    /// Public visibility flag.
    pub is_public: bool,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        files: Arc<dyn FileRepository>,
        folders: Arc<dyn FolderRepository>,
        buckets: Arc<dyn BucketRepository>,
        objects: Arc<dyn ObjectStore>,
        config: StorageConfig,
    ) -> Self {
        Self {
            files,
            folders,
            buckets,
            objects,
            config,
        }
    }

    /// Uploads a file into a bucket, optionally inside a folder.
    pub async fn upload(&self, ctx: &RequestContext, req: UploadRequest) -> AppResult<File> {
        if req.data.is_empty() {
            return Err(AppError::validation("File is empty"));
        }
        if req.data.len() as u64 > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }
        ensure(validate_file_name(&req.file_name))?;

        let bucket = lookup::owned_bucket(ctx, self.buckets.as_ref(), req.bucket_id).await?;

        let folder_path = match req.folder_id {
            Some(folder_id) => Some(
                lookup::placement_target(ctx, self.folders.as_ref(), bucket.id, folder_id)
                    .await?
                    .full_location(),
            ),
            None => None,
        };

        let id = FileId::new();
        let name = path::sanitize_file_name(req.file_name.trim());
        let object_key = match self.config.key_layout {
            KeyLayout::IdQualified => path::build_object_key(folder_path.as_deref(), id, &name),
            KeyLayout::NameOnly => path::build_object_key_unqualified(folder_path.as_deref(), &name),
        };
        let content_type = req
            .content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let size_bytes = req.data.len() as i64;

        ctx.guard(self.objects.put(
            &bucket.name,
            &object_key,
            req.data,
            &content_type,
            req.is_public,
        ))
        .await?;

        let now = Utc::now();
        let file = File {
            id,
            tenant_id: ctx.tenant_id,
            bucket_id: bucket.id,
            folder_id: req.folder_id,
            folder_path,
            name,
            public_url: req
                .is_public
                .then(|| self.objects.public_url(&bucket.name, &object_key)),
            object_key,
            content_type,
            size_bytes,
            is_public: req.is_public,
            is_deleted: false,
            uploaded_by: ctx.user_id,
            created_at: now,
            updated_at: now,
        };
        persist(ctx, self.files.as_ref(), &file, true).await?;

        info!(
            tenant_id = %ctx.tenant_id,
            user_id = %ctx.user_id,
            file_id = %file.id,
            bucket = %bucket.name,
            object_key = %file.object_key,
            size = file.size_bytes,
            "Upload completed"
        );

        Ok(file)
    }
}
