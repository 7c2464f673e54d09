//! In-memory object store.
//!
//! Every call is counted so callers can assert how many round trips an
//! operation issued. Deletes can be made to fail to exercise best-effort
//! cleanup paths.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::{DashMap, DashSet};
use tracing::debug;

use filevault_core::error::AppError;
use filevault_core::result::AppResult;
use filevault_core::traits::storage::{ByteStream, ObjectStore, collect_stream};

use crate::public_url::PublicUrlScheme;

/// A stored object with its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object contents.
    pub data: Bytes,
    /// MIME type given at upload.
    pub content_type: String,
    /// Public-read flag.
    pub is_public: bool,
}

/// Process-local object store.
#[derive(Debug, Clone)]
pub struct MemoryObjectStore {
    containers: Arc<DashSet<String>>,
    objects: Arc<DashMap<(String, String), StoredObject>>,
    operations: Arc<AtomicU64>,
    fail_deletes: Arc<AtomicBool>,
    urls: PublicUrlScheme,
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new("memory://objects")
    }
}

impl MemoryObjectStore {
    /// Create an empty store whose public URLs start with `public_base_url`.
    pub fn new(public_base_url: &str) -> Self {
        Self {
            containers: Arc::new(DashSet::new()),
            objects: Arc::new(DashMap::new()),
            operations: Arc::new(AtomicU64::new(0)),
            fail_deletes: Arc::new(AtomicBool::new(false)),
            urls: PublicUrlScheme::resolve(Some(public_base_url), None, ""),
        }
    }

    /// Number of I/O calls issued so far (`public_url` is not I/O).
    pub fn operation_count(&self) -> u64 {
        self.operations.load(Ordering::SeqCst)
    }

    /// Number of stored objects across all containers.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Snapshot of a stored object.
    pub fn object(&self, container: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .get(&(container.to_string(), key.to_string()))
            .map(|o| o.value().clone())
    }

    /// Keys stored in a container, sorted.
    pub fn keys(&self, container: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .iter()
            .filter(|entry| entry.key().0 == container)
            .map(|entry| entry.key().1.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Make every subsequent delete fail with a storage error.
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    fn record(&self) {
        self.operations.fetch_add(1, Ordering::SeqCst);
    }

    fn require_container(&self, container: &str) -> AppResult<()> {
        if self.containers.contains(container) {
            Ok(())
        } else {
            Err(AppError::storage(format!(
                "Container '{container}' does not exist"
            )))
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn create_container(&self, container: &str, _is_public: bool) -> AppResult<()> {
        self.record();
        self.containers.insert(container.to_string());
        Ok(())
    }

    async fn container_exists(&self, container: &str) -> AppResult<bool> {
        self.record();
        Ok(self.containers.contains(container))
    }

    async fn put(
        &self,
        container: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
        is_public: bool,
    ) -> AppResult<()> {
        self.record();
        self.require_container(container)?;
        debug!(container, key, bytes = data.len(), "Stored object");
        self.objects.insert(
            (container.to_string(), key.to_string()),
            StoredObject {
                data,
                content_type: content_type.to_string(),
                is_public,
            },
        );
        Ok(())
    }

    async fn put_stream(
        &self,
        container: &str,
        key: &str,
        stream: ByteStream,
        content_type: &str,
        is_public: bool,
    ) -> AppResult<u64> {
        let data = collect_stream(stream).await?;
        let len = data.len() as u64;
        self.put(container, key, data, content_type, is_public).await?;
        Ok(len)
    }

    async fn get(&self, container: &str, key: &str) -> AppResult<Option<ByteStream>> {
        self.record();
        let Some(object) = self.object(container, key) else {
            return Ok(None);
        };
        let stream: ByteStream = Box::pin(futures::stream::once(async move { Ok(object.data) }));
        Ok(Some(stream))
    }

    async fn delete(&self, container: &str, key: &str) -> AppResult<()> {
        self.record();
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::storage(format!(
                "Failed to delete object: {container}/{key}"
            )));
        }
        self.objects.remove(&(container.to_string(), key.to_string()));
        Ok(())
    }

    async fn exists(&self, container: &str, key: &str) -> AppResult<bool> {
        self.record();
        Ok(self
            .objects
            .contains_key(&(container.to_string(), key.to_string())))
    }

    async fn set_visibility(&self, container: &str, key: &str, is_public: bool) -> AppResult<()> {
        self.record();
        match self
            .objects
            .get_mut(&(container.to_string(), key.to_string()))
        {
            Some(mut object) => {
                object.is_public = is_public;
                Ok(())
            }
            None => Err(AppError::storage(format!(
                "Object not found: {container}/{key}"
            ))),
        }
    }

    fn public_url(&self, container: &str, key: &str) -> String {
        self.urls.url(container, key)
    }
}
