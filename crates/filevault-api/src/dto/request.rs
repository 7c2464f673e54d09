//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use filevault_core::types::{BucketId, FolderId};
use filevault_service::bucket::CreateBucketRequest;
use filevault_service::file::{DuplicateFileRequest, UpdateFileRequest};
use filevault_service::folder::{CreateFolderRequest, TreeQuery, UpdateFolderRequest};

/// Create bucket request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBucketBody {
    /// Bucket name (also the container name).
    #[validate(length(min = 3, max = 63, message = "Bucket name must be 3 to 63 characters"))]
    pub name: String,
    /// Public visibility.
    #[serde(default)]
    pub is_public: bool,
    /// Region hint.
    pub region: Option<String>,
}

impl From<CreateBucketBody> for CreateBucketRequest {
    fn from(body: CreateBucketBody) -> Self {
        Self {
            name: body.name,
            is_public: body.is_public,
            region: body.region,
        }
    }
}

/// Create folder request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderBody {
    /// Owning bucket.
    pub bucket_id: BucketId,
    /// Parent folder; a root folder when absent.
    pub parent_id: Option<FolderId>,
    /// Folder name.
    #[validate(length(min = 1, max = 255, message = "Folder name must be 1 to 255 characters"))]
    pub name: String,
    /// Public visibility.
    #[serde(default)]
    pub is_public: bool,
}

impl From<CreateFolderBody> for CreateFolderRequest {
    fn from(body: CreateFolderBody) -> Self {
        Self {
            bucket_id: body.bucket_id,
            parent_id: body.parent_id,
            name: body.name,
            is_public: body.is_public,
        }
    }
}

/// Partial folder update body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateFolderBody {
    /// New name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// New visibility.
    pub is_public: Option<bool>,
}

impl From<UpdateFolderBody> for UpdateFolderRequest {
    fn from(body: UpdateFolderBody) -> Self {
        Self {
            name: body.name,
            is_public: body.is_public,
        }
    }
}

/// Move folder body. A missing or null `parent_id` moves to the root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveFolderBody {
    /// New parent.
    #[serde(default)]
    pub parent_id: Option<FolderId>,
}

/// Query string of `GET /api/folders/tree`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeParams {
    /// List under this folder.
    pub parent_id: Option<FolderId>,
    /// Levels to list; clamped by the engine.
    pub depth: Option<u32>,
    /// Whether empty folders are listed.
    pub include_empty: Option<bool>,
}

impl From<TreeParams> for TreeQuery {
    fn from(params: TreeParams) -> Self {
        let defaults = TreeQuery::default();
        Self {
            parent_id: params.parent_id,
            depth: params.depth.unwrap_or(defaults.depth),
            include_empty: params.include_empty.unwrap_or(defaults.include_empty),
        }
    }
}

/// Partial file update body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateFileBody {
    /// New name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// New folder.
    pub folder_id: Option<FolderId>,
    /// New visibility.
    pub is_public: Option<bool>,
}

impl From<UpdateFileBody> for UpdateFileRequest {
    fn from(body: UpdateFileBody) -> Self {
        Self {
            name: body.name,
            folder_id: body.folder_id,
            is_public: body.is_public,
        }
    }
}

/// Move file body. A missing or null `folder_id` moves to the bucket root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveFileBody {
    /// Target folder.
    #[serde(default)]
    pub folder_id: Option<FolderId>,
}

/// Duplicate file body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DuplicateFileBody {
    /// Target folder; the bucket root when absent.
    #[serde(default)]
    pub target_folder_id: Option<FolderId>,
    /// Name of the copy.
    #[validate(length(min = 1, max = 255))]
    pub new_name: Option<String>,
}

impl From<DuplicateFileBody> for DuplicateFileRequest {
    fn from(body: DuplicateFileBody) -> Self {
        Self {
            target_folder_id: body.target_folder_id,
            new_name: body.new_name,
        }
    }
}

/// Query string of `DELETE /api/files/{id}`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DeleteFileParams {
    /// Remove the object and the record instead of soft-deleting.
    #[serde(default)]
    pub hard: bool,
}

/// Backfill request body.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BackfillBody {
    /// Also relocate objects whose key is stale.
    #[serde(default)]
    pub relocate_objects: bool,
}
