//! File download: content streams and time-limited download links.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use filevault_core::error::AppError;
use filevault_core::result::AppResult;
use filevault_core::traits::storage::{ByteStream, ObjectStore};
use filevault_core::types::FileId;
use filevault_database::repositories::{BucketRepository, FileRepository};
use filevault_entity::{DownloadLink, File};

use crate::context::RequestContext;
use crate::lookup;

/// Handles file downloads.
#[derive(Debug, Clone)]
pub struct DownloadService {
    /// File repository.
    files: Arc<dyn FileRepository>,
    /// Bucket repository.
    buckets: Arc<dyn BucketRepository>,
    /// Object store.
    objects: Arc<dyn ObjectStore>,
    /// Lifetime of generated download links.
    link_ttl: Duration,
}

/// File metadata together with its content stream.
pub struct DownloadResult {
    /// File metadata.
    pub file: File,
    /// File content.
    pub stream: ByteStream,
}

impl std::fmt::Debug for DownloadResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadResult")
            .field("file", &self.file)
            .finish_non_exhaustive()
    }
}

impl DownloadService {
    /// Creates a new download service.
    pub fn new(
        files: Arc<dyn FileRepository>,
        buckets: Arc<dyn BucketRepository>,
        objects: Arc<dyn ObjectStore>,
        link_ttl: Duration,
    ) -> Self {
        Self {
            files,
            buckets,
            objects,
            link_ttl,
        }
    }

    /// Opens a file's content. A record whose object is gone is `NotFound`.
    pub async fn download(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<DownloadResult> {
        let file = lookup::active_file(ctx, self.files.as_ref(), file_id).await?;
        let bucket = lookup::owned_bucket(ctx, self.buckets.as_ref(), file.bucket_id).await?;

        let stream = ctx
            .guard(self.objects.get(&bucket.name, &file.object_key))
            .await?
            .ok_or_else(|| {
                warn!(
                    file_id = %file.id,
                    bucket = %bucket.name,
                    object_key = %file.object_key,
                    "File record has no object"
                );
                AppError::not_found(format!("Content of file {file_id} not found"))
            })?;

        debug!(tenant_id = %ctx.tenant_id, file_id = %file.id, "Download started");
        Ok(DownloadResult { file, stream })
    }

    /// Builds a download link. Public files use their stored public URL;
    /// private ones get a URL from the object store valid for the
    /// configured lifetime.
    pub async fn download_url(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<DownloadLink> {
        let file = lookup::active_file(ctx, self.files.as_ref(), file_id).await?;

        let url = match (&file.public_url, file.is_public) {
            (Some(url), true) => url.clone(),
            _ => {
                let bucket =
                    lookup::owned_bucket(ctx, self.buckets.as_ref(), file.bucket_id).await?;
                ctx.guard(
                    self.objects
                        .presigned_url(&bucket.name, &file.object_key, self.link_ttl),
                )
                .await?
            }
        };

        let ttl = chrono::Duration::from_std(self.link_ttl)
            .map_err(|e| AppError::internal(format!("Invalid download link lifetime: {e}")))?;

        Ok(DownloadLink {
            url,
            file_name: file.name,
            size_bytes: file.size_bytes,
            expires_at: Utc::now() + ttl,
        })
    }
}
