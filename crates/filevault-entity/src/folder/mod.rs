//! Folder domain entities.

pub mod model;
pub mod tree;

pub use model::{Folder, FolderMove};
pub use tree::{FolderDetail, FolderPermissions};
