//! # filevault-service
//!
//! The folder hierarchy and file placement engines. Each service reads
//! current state through the metadata repositories, computes paths and
//! object keys with [`filevault_core::path`], relocates objects through the
//! [`ObjectStore`](filevault_core::traits::storage::ObjectStore) when a key
//! changes, and writes the new record last.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod bucket;
pub mod context;
pub mod file;
pub mod folder;
pub mod validation;

mod lookup;

pub use bucket::BucketService;
pub use context::RequestContext;
pub use file::{DownloadService, FileService, Relocator, UploadService};
pub use folder::{FolderService, PathRepairService, TreeService};
