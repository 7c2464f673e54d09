//! Folder hierarchy, tree listing and path backfill services.

pub mod repair;
pub mod service;
pub mod tree;

pub use repair::{BackfillReport, PathRepairService};
pub use service::{CreateFolderRequest, FolderService, UpdateFolderRequest};
pub use tree::{TreeQuery, TreeService};
