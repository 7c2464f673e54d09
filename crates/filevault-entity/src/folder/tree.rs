//! Folder tree structures for hierarchical listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use filevault_core::types::{FolderId, UserId};

use super::model::Folder;

/// Static capability flags reported with every folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderPermissions {
    /// Caller may list the folder.
    pub can_view: bool,
    /// Caller may rename or move the folder.
    pub can_edit: bool,
    /// Caller may delete the folder.
    pub can_delete: bool,
    /// Caller may share the folder.
    pub can_share: bool,
}

impl FolderPermissions {
    /// Every capability granted.
    pub fn all() -> Self {
        Self {
            can_view: true,
            can_edit: true,
            can_delete: true,
            can_share: true,
        }
    }
}

/// A node in a materialized folder tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderDetail {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Parent folder ID.
    pub parent_id: Option<FolderId>,
    /// Ancestor names followed by the folder's own name.
    pub path: Vec<String>,
    /// Number of ancestors.
    pub depth: usize,
    /// Active files directly inside the folder.
    pub file_count: usize,
    /// Active subfolders directly inside the folder.
    pub folder_count: usize,
    /// Total size in bytes of the active files directly inside the folder.
    pub total_size: i64,
    /// Visibility flag.
    pub is_public: bool,
    /// Capability flags.
    pub permissions: FolderPermissions,
    /// Child nodes; empty when the depth budget is exhausted.
    pub children: Vec<FolderDetail>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Creator.
    pub created_by: UserId,
}

impl FolderDetail {
    /// Detail record for `folder` with the given direct counts and no children.
    pub fn new(folder: &Folder, file_count: usize, folder_count: usize, total_size: i64) -> Self {
        Self {
            id: folder.id,
            name: folder.name.clone(),
            parent_id: folder.parent_id,
            path: folder.breadcrumbs(),
            depth: folder.depth(),
            file_count,
            folder_count,
            total_size,
            is_public: folder.is_public,
            permissions: FolderPermissions::all(),
            children: Vec::new(),
            created_at: folder.created_at,
            updated_at: folder.updated_at,
            created_by: folder.created_by,
        }
    }

    /// Neither files nor subfolders directly inside.
    pub fn is_empty(&self) -> bool {
        self.file_count == 0 && self.folder_count == 0
    }
}
