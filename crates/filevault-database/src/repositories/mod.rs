//! Repository traits consumed by the engines and their PostgreSQL
//! implementations.
//!
//! Listing methods return soft-deleted rows as well; filtering on
//! `is_deleted` is the engines' job. Saves are upserts keyed by id.

pub mod bucket;
pub mod file;
pub mod folder;

use async_trait::async_trait;

use filevault_core::result::AppResult;
use filevault_core::types::{BucketId, FileId, FolderId, TenantId};
use filevault_entity::{Bucket, File, Folder};

pub use bucket::PgBucketRepository;
pub use file::PgFileRepository;
pub use folder::PgFolderRepository;

/// Folder records keyed by id, with lookups by location, bucket, parent and tenant.
#[async_trait]
pub trait FolderRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Find a folder by ID, deleted or not.
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// Find the active folder named `name` at `path` inside a bucket.
    async fn find_by_location(
        &self,
        bucket_id: BucketId,
        path: &str,
        name: &str,
    ) -> AppResult<Option<Folder>>;

    /// All folders of a bucket.
    async fn find_by_bucket(&self, bucket_id: BucketId) -> AppResult<Vec<Folder>>;

    /// Direct children of a folder.
    async fn find_by_parent(&self, parent_id: FolderId) -> AppResult<Vec<Folder>>;

    /// All folders of a tenant.
    async fn find_by_tenant(&self, tenant_id: TenantId) -> AppResult<Vec<Folder>>;

    /// Insert or replace a folder.
    async fn save(&self, folder: &Folder) -> AppResult<()>;

    /// Physically remove a folder. Returns `true` if a row was removed.
    async fn delete(&self, id: FolderId) -> AppResult<bool>;
}

/// File records keyed by id, with lookups by bucket, folder and tenant.
#[async_trait]
pub trait FileRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Find a file by ID, deleted or not.
    async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>>;

    /// All files of a bucket.
    async fn find_by_bucket(&self, bucket_id: BucketId) -> AppResult<Vec<File>>;

    /// Files directly inside a folder.
    async fn find_by_folder(&self, folder_id: FolderId) -> AppResult<Vec<File>>;

    /// All files of a tenant.
    async fn find_by_tenant(&self, tenant_id: TenantId) -> AppResult<Vec<File>>;

    /// Insert or replace a file.
    async fn save(&self, file: &File) -> AppResult<()>;

    /// Physically remove a file. Returns `true` if a row was removed.
    async fn delete(&self, id: FileId) -> AppResult<bool>;
}

/// Bucket records keyed by id and by unique name.
#[async_trait]
pub trait BucketRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Find a bucket by ID.
    async fn find_by_id(&self, id: BucketId) -> AppResult<Option<Bucket>>;

    /// Find a bucket by its container name.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Bucket>>;

    /// All buckets of a tenant.
    async fn find_by_tenant(&self, tenant_id: TenantId) -> AppResult<Vec<Bucket>>;

    /// Insert or replace a bucket.
    async fn save(&self, bucket: &Bucket) -> AppResult<()>;
}
