//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filevault_core::path;
use filevault_core::types::{BucketId, FileId, FolderId, TenantId, UserId};

/// A file record. Its bytes live in the object store under `object_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Bucket holding the object.
    pub bucket_id: BucketId,
    /// Owning folder (None at the bucket root).
    pub folder_id: Option<FolderId>,
    /// Full location of the owning folder at last placement.
    pub folder_path: Option<String>,
    /// Display name.
    pub name: String,
    /// Key of the object inside the bucket.
    pub object_key: String,
    /// MIME type.
    pub content_type: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// Public visibility flag.
    pub is_public: bool,
    /// Derived public URL, present only while public.
    pub public_url: Option<String>,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// Caller that uploaded the file.
    pub uploaded_by: UserId,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// Not soft-deleted.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Folder path as a borrowed string, treating empty as root.
    pub fn folder_path(&self) -> Option<&str> {
        self.folder_path.as_deref().filter(|p| !p.is_empty())
    }

    /// The id-qualified key this file should be stored under.
    pub fn expected_key(&self) -> String {
        path::build_object_key(self.folder_path(), self.id, &self.name)
    }

    /// Extension including the dot, if any.
    pub fn extension(&self) -> Option<&str> {
        let (_, ext) = path::split_extension(&self.name);
        (!ext.is_empty()).then_some(ext)
    }

    /// Refresh the update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
