//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filevault_core::path;
use filevault_core::types::{BucketId, FolderId, TenantId, UserId};

/// A virtual folder. Folders have no object of their own in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Bucket the folder lives in.
    pub bucket_id: BucketId,
    /// Parent folder ID (None for root folders).
    pub parent_id: Option<FolderId>,
    /// Folder name.
    pub name: String,
    /// Slash-joined ancestor names, excluding the folder's own name.
    /// Empty for root folders.
    pub path: String,
    /// Public visibility flag.
    pub is_public: bool,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// Caller that created the folder.
    pub created_by: UserId,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Build a new, active folder record.
    pub fn new(
        tenant_id: TenantId,
        bucket_id: BucketId,
        parent_id: Option<FolderId>,
        name: impl Into<String>,
        path: impl Into<String>,
        is_public: bool,
        created_by: UserId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: FolderId::new(),
            tenant_id,
            bucket_id,
            parent_id,
            name: name.into(),
            path: path.into(),
            is_public,
            is_deleted: false,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Not soft-deleted.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// The path children of this folder are stored under.
    pub fn full_location(&self) -> String {
        path::full_location(&self.path, &self.name)
    }

    /// Ancestor names followed by this folder's own name.
    pub fn breadcrumbs(&self) -> Vec<String> {
        path::breadcrumbs(&self.path, &self.name)
    }

    /// Number of ancestors (0 for root folders).
    pub fn depth(&self) -> usize {
        path::depth(&self.path)
    }

    /// Refresh the update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Result of moving a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderMove {
    /// The folder that was moved.
    pub folder_id: FolderId,
    /// Parent after the move (None at the root).
    pub parent_id: Option<FolderId>,
    /// Breadcrumb trail of the folder's new location, ending with its name.
    pub path: Vec<String>,
}
