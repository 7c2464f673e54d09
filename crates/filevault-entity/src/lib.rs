//! # filevault-entity
//!
//! Domain entity models for FileVault. Buckets, folders and files are
//! metadata store rows and derive `sqlx::FromRow`; the tree and outcome
//! types are value objects returned by the engines.

pub mod bucket;
pub mod file;
pub mod folder;

pub use bucket::{Bucket, BucketStatus};
pub use file::{DownloadLink, File};
pub use folder::{Folder, FolderDetail, FolderMove, FolderPermissions};
