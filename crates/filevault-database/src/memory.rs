//! In-memory metadata store built on `dashmap`.
//!
//! Used by tests and by single-process deployments that do not need
//! durability. Child folders are additionally indexed by parent id; the
//! index may hold stale entries after concurrent re-parenting, so every
//! lookup through it re-checks the record's current parent.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use filevault_core::error::AppError;
use filevault_core::result::AppResult;
use filevault_core::types::{BucketId, FileId, FolderId, TenantId};
use filevault_entity::{Bucket, File, Folder};

use crate::repositories::{BucketRepository, FileRepository, FolderRepository};

/// Process-local folder, file and bucket records.
#[derive(Debug, Clone, Default)]
pub struct MemoryMetadataStore {
    folders: Arc<DashMap<FolderId, Folder>>,
    children: Arc<DashMap<FolderId, BTreeSet<FolderId>>>,
    files: Arc<DashMap<FileId, File>>,
    buckets: Arc<DashMap<BucketId, Bucket>>,
}

impl MemoryMetadataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of folder records, deleted ones included.
    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    /// Number of file records, deleted ones included.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    fn index_child(&self, parent: Option<FolderId>, child: FolderId) {
        if let Some(parent) = parent {
            self.children.entry(parent).or_default().insert(child);
        }
    }

    fn unindex_child(&self, parent: Option<FolderId>, child: FolderId) {
        if let Some(parent) = parent {
            if let Some(mut set) = self.children.get_mut(&parent) {
                set.remove(&child);
            }
        }
    }

    fn collect_folders(&self, predicate: impl Fn(&Folder) -> bool) -> Vec<Folder> {
        let mut folders: Vec<Folder> = self
            .folders
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        folders.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.name.cmp(&b.name)));
        folders
    }

    fn collect_files(&self, predicate: impl Fn(&File) -> bool) -> Vec<File> {
        let mut files: Vec<File> = self
            .files
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        files
    }
}

#[async_trait]
impl FolderRepository for MemoryMetadataStore {
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        Ok(self.folders.get(&id).map(|f| f.value().clone()))
    }

    async fn find_by_location(
        &self,
        bucket_id: BucketId,
        path: &str,
        name: &str,
    ) -> AppResult<Option<Folder>> {
        Ok(self
            .folders
            .iter()
            .find(|entry| {
                let f = entry.value();
                f.bucket_id == bucket_id && f.path == path && f.name == name && f.is_active()
            })
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_bucket(&self, bucket_id: BucketId) -> AppResult<Vec<Folder>> {
        Ok(self.collect_folders(|f| f.bucket_id == bucket_id))
    }

    async fn find_by_parent(&self, parent_id: FolderId) -> AppResult<Vec<Folder>> {
        let ids: Vec<FolderId> = self
            .children
            .get(&parent_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();

        let mut folders: Vec<Folder> = ids
            .into_iter()
            .filter_map(|id| self.folders.get(&id).map(|f| f.value().clone()))
            .filter(|f| f.parent_id == Some(parent_id))
            .collect();
        folders.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(folders)
    }

    async fn find_by_tenant(&self, tenant_id: TenantId) -> AppResult<Vec<Folder>> {
        Ok(self.collect_folders(|f| f.tenant_id == tenant_id))
    }

    async fn save(&self, folder: &Folder) -> AppResult<()> {
        let previous = self.folders.insert(folder.id, folder.clone());
        let previous_parent = previous.and_then(|p| p.parent_id);
        if previous_parent != folder.parent_id {
            self.unindex_child(previous_parent, folder.id);
        }
        self.index_child(folder.parent_id, folder.id);
        debug!(folder_id = %folder.id, "Folder saved");
        Ok(())
    }

    async fn delete(&self, id: FolderId) -> AppResult<bool> {
        match self.folders.remove(&id) {
            Some((_, folder)) => {
                self.unindex_child(folder.parent_id, id);
                self.children.remove(&id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl FileRepository for MemoryMetadataStore {
    async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>> {
        Ok(self.files.get(&id).map(|f| f.value().clone()))
    }

    async fn find_by_bucket(&self, bucket_id: BucketId) -> AppResult<Vec<File>> {
        Ok(self.collect_files(|f| f.bucket_id == bucket_id))
    }

    async fn find_by_folder(&self, folder_id: FolderId) -> AppResult<Vec<File>> {
        let mut files = self.collect_files(|f| f.folder_id == Some(folder_id));
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    async fn find_by_tenant(&self, tenant_id: TenantId) -> AppResult<Vec<File>> {
        Ok(self.collect_files(|f| f.tenant_id == tenant_id))
    }

    async fn save(&self, file: &File) -> AppResult<()> {
        self.files.insert(file.id, file.clone());
        debug!(file_id = %file.id, "File saved");
        Ok(())
    }

    async fn delete(&self, id: FileId) -> AppResult<bool> {
        Ok(self.files.remove(&id).is_some())
    }
}

#[async_trait]
impl BucketRepository for MemoryMetadataStore {
    async fn find_by_id(&self, id: BucketId) -> AppResult<Option<Bucket>> {
        Ok(self.buckets.get(&id).map(|b| b.value().clone()))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Bucket>> {
        Ok(self
            .buckets
            .iter()
            .find(|entry| entry.value().name == name)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_tenant(&self, tenant_id: TenantId) -> AppResult<Vec<Bucket>> {
        let mut buckets: Vec<Bucket> = self
            .buckets
            .iter()
            .filter(|entry| entry.value().tenant_id == tenant_id)
            .map(|entry| entry.value().clone())
            .collect();
        buckets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(buckets)
    }

    async fn save(&self, bucket: &Bucket) -> AppResult<()> {
        let taken = self
            .buckets
            .iter()
            .any(|entry| entry.value().name == bucket.name && entry.key() != &bucket.id);
        if taken {
            return Err(AppError::conflict(format!(
                "Bucket '{}' already exists",
                bucket.name
            )));
        }
        self.buckets.insert(bucket.id, bucket.clone());
        Ok(())
    }
}
