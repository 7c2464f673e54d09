//! Local filesystem object store.
//!
//! Layout: `{root}/{container}/{key}`. The filesystem has no ACLs, so the
//! public flag is accepted and ignored; public URLs are formed from the
//! configured base URL.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::debug;

use filevault_core::error::{AppError, ErrorKind};
use filevault_core::result::AppResult;
use filevault_core::traits::storage::{ByteStream, ObjectStore};

use crate::public_url::PublicUrlScheme;

/// Filesystem-backed object store.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    /// Directory holding one sub-directory per container.
    root: PathBuf,
    /// Public URL scheme.
    urls: PublicUrlScheme,
}

impl LocalObjectStore {
    /// Create a new local object store rooted at the given path.
    ///
    /// Without a `public_base_url`, URLs point at the files themselves.
    pub async fn new(root_path: &str, public_base_url: Option<&str>) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;

        let base = public_base_url
            .map(str::to_string)
            .unwrap_or_else(|| format!("file://{}", root.display()));
        Ok(Self {
            root,
            urls: PublicUrlScheme::resolve(Some(&base), None, ""),
        })
    }

    fn container_dir(&self, container: &str) -> AppResult<PathBuf> {
        Ok(self.root.join(checked_relative(container)?))
    }

    /// Resolve a key to a path inside its container directory.
    fn resolve(&self, container: &str, key: &str) -> AppResult<PathBuf> {
        Ok(self.container_dir(container)?.join(checked_relative(key)?))
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    async fn require_container(&self, container: &str) -> AppResult<()> {
        if self.container_exists(container).await? {
            Ok(())
        } else {
            Err(AppError::storage(format!(
                "Container '{container}' does not exist"
            )))
        }
    }
}

/// Reject keys that would escape their container (`..`, absolute paths).
fn checked_relative(key: &str) -> AppResult<PathBuf> {
    let trimmed = key.trim_start_matches('/');
    let path = PathBuf::from(trimmed);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));
    if trimmed.is_empty() || escapes {
        return Err(AppError::validation(format!("Invalid object key: '{key}'")));
    }
    Ok(path)
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.is_dir())
    }

    async fn create_container(&self, container: &str, _is_public: bool) -> AppResult<()> {
        let dir = self.container_dir(container)?;
        fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create container: {container}"),
                e,
            )
        })?;
        debug!(container, "Created container directory");
        Ok(())
    }

    async fn container_exists(&self, container: &str) -> AppResult<bool> {
        Ok(self.container_dir(container)?.is_dir())
    }

    async fn put(
        &self,
        container: &str,
        key: &str,
        data: Bytes,
        _content_type: &str,
        _is_public: bool,
    ) -> AppResult<()> {
        self.require_container(container).await?;
        let full_path = self.resolve(container, key)?;
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write object: {container}/{key}"),
                e,
            )
        })?;

        debug!(container, key, bytes = data.len(), "Wrote object");
        Ok(())
    }

    async fn put_stream(
        &self,
        container: &str,
        key: &str,
        mut stream: ByteStream,
        _content_type: &str,
        _is_public: bool,
    ) -> AppResult<u64> {
        self.require_container(container).await?;
        let full_path = self.resolve(container, key)?;
        self.ensure_parent(&full_path).await?;

        let mut file = fs::File::create(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create object: {container}/{key}"),
                e,
            )
        })?;

        let mut total_bytes = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| AppError::with_source(ErrorKind::Storage, "Stream read error", e))?;
            total_bytes += chunk.len() as u64;
            file.write_all(&chunk).await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to write chunk", e)
            })?;
        }

        file.flush()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to flush object", e))?;

        debug!(container, key, bytes = total_bytes, "Wrote object from stream");
        Ok(total_bytes)
    }

    async fn get(&self, container: &str, key: &str) -> AppResult<Option<ByteStream>> {
        let full_path = self.resolve(container, key)?;
        match fs::File::open(&full_path).await {
            Ok(file) => {
                let stream: ByteStream = Box::pin(ReaderStream::new(file));
                Ok(Some(stream))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to open object: {container}/{key}"),
                e,
            )),
        }
    }

    async fn delete(&self, container: &str, key: &str) -> AppResult<()> {
        let full_path = self.resolve(container, key)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(container, key, "Deleted object");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete object: {container}/{key}"),
                e,
            )),
        }
    }

    async fn exists(&self, container: &str, key: &str) -> AppResult<bool> {
        Ok(self.resolve(container, key)?.is_file())
    }

    async fn set_visibility(&self, container: &str, key: &str, is_public: bool) -> AppResult<()> {
        if !self.exists(container, key).await? {
            return Err(AppError::storage(format!(
                "Object not found: {container}/{key}"
            )));
        }
        debug!(container, key, is_public, "Visibility is not enforced on local storage");
        Ok(())
    }

    fn public_url(&self, container: &str, key: &str) -> String {
        self.urls.url(container, key)
    }
}
