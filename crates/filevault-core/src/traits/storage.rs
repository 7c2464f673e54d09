//! Object store trait for pluggable blob backends.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, TryStreamExt};

use crate::error::{AppError, ErrorKind};
use crate::result::AppResult;

/// A byte stream type used for reading object contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Blob storage addressed by (container, key).
///
/// Implementations live in `filevault-storage` (local filesystem, in-memory
/// and S3). A missing key is never an error on read: [`ObjectStore::get`]
/// returns `Ok(None)` so callers can decide how to surface it.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Create a container. Succeeds if it already exists.
    async fn create_container(&self, container: &str, is_public: bool) -> AppResult<()>;

    /// Check whether a container exists.
    async fn container_exists(&self, container: &str) -> AppResult<bool>;

    /// Store `data` under `key`, replacing any existing object.
    async fn put(
        &self,
        container: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
        is_public: bool,
    ) -> AppResult<()>;

    /// Store a byte stream under `key`. Returns the number of bytes written.
    async fn put_stream(
        &self,
        container: &str,
        key: &str,
        stream: ByteStream,
        content_type: &str,
        is_public: bool,
    ) -> AppResult<u64>;

    /// Open the object for reading, or `None` if the key does not exist.
    async fn get(&self, container: &str, key: &str) -> AppResult<Option<ByteStream>>;

    /// Delete the object. Deleting a missing key succeeds.
    async fn delete(&self, container: &str, key: &str) -> AppResult<()>;

    /// Check whether an object exists.
    async fn exists(&self, container: &str, key: &str) -> AppResult<bool>;

    /// Change the object's public-read flag.
    async fn set_visibility(&self, container: &str, key: &str, is_public: bool) -> AppResult<()>;

    /// Derive the public URL for an object. Pure; performs no I/O.
    fn public_url(&self, container: &str, key: &str) -> String;

    /// A time-limited URL for downloading a private object.
    ///
    /// Backends without signing support hand out the public URL.
    async fn presigned_url(&self, container: &str, key: &str, ttl: Duration) -> AppResult<String> {
        let _ = ttl;
        Ok(self.public_url(container, key))
    }
}

/// Drain a [`ByteStream`] into a single contiguous buffer.
pub async fn collect_stream(stream: ByteStream) -> AppResult<Bytes> {
    let chunks: Vec<Bytes> = stream
        .try_collect()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to read object stream", e))?;

    if chunks.len() == 1 {
        return Ok(chunks.into_iter().next().unwrap_or_default());
    }
    Ok(Bytes::from(chunks.concat()))
}
