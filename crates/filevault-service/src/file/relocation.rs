//! Physical object relocation: download old key, upload new key, delete old key.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use filevault_core::error::AppError;
use filevault_core::result::AppResult;
use filevault_core::traits::storage::{ByteStream, ObjectStore};

use crate::context::RequestContext;

/// Moves objects between keys of one container.
///
/// There is no server-side copy in the object store contract, so a
/// relocation streams the object through this process.
#[derive(Debug, Clone)]
pub struct Relocator {
    /// Object store.
    objects: Arc<dyn ObjectStore>,
}

impl Relocator {
    /// Creates a new relocator.
    pub fn new(objects: Arc<dyn ObjectStore>) -> Self {
        Self { objects }
    }

    /// Open the object at `key`, failing with a storage error when it is
    /// absent. Callers may retry.
    pub async fn open(
        &self,
        ctx: &RequestContext,
        container: &str,
        key: &str,
    ) -> AppResult<ByteStream> {
        ctx.guard(self.objects.get(container, key))
            .await?
            .ok_or_else(|| {
                warn!(container, key, "Source object missing");
                AppError::storage(format!("Failed to download file {container}/{key}"))
            })
    }

    /// Copy `from` to `to`, then remove `from`.
    ///
    /// The new object is in place once this returns `Ok`. Failing to delete
    /// the old object leaves an orphan behind and is only logged.
    /// Returns the number of bytes copied.
    pub async fn relocate(
        &self,
        ctx: &RequestContext,
        container: &str,
        from: &str,
        to: &str,
        content_type: &str,
        is_public: bool,
    ) -> AppResult<u64> {
        let start = Instant::now();
        let source = self.open(ctx, container, from).await?;

        let bytes = ctx
            .guard(
                self.objects
                    .put_stream(container, to, source, content_type, is_public),
            )
            .await?;

        self.remove_best_effort(ctx, container, from).await;

        info!(
            container,
            from,
            to,
            bytes,
            duration_ms = start.elapsed().as_millis() as u64,
            "Object relocated"
        );
        Ok(bytes)
    }

    /// Delete an object, logging instead of failing.
    ///
    /// Returns whether the delete went through.
    pub async fn remove_best_effort(&self, ctx: &RequestContext, container: &str, key: &str) -> bool {
        match ctx.guard(self.objects.delete(container, key)).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    container,
                    key,
                    error = %e,
                    "Failed to delete old object; it is now orphaned"
                );
                false
            }
        }
    }
}
