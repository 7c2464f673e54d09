//! Folder tree materialization for hierarchical listing.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

use filevault_core::result::AppResult;
use filevault_core::types::FolderId;
use filevault_database::repositories::{FileRepository, FolderRepository};
use filevault_entity::{Folder, FolderDetail};

use crate::context::RequestContext;
use crate::lookup;

/// Shallowest tree a listing returns.
pub const MIN_TREE_DEPTH: u32 = 1;
/// Deepest tree a listing returns.
pub const MAX_TREE_DEPTH: u32 = 5;

/// Parameters of a tree listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TreeQuery {
    /// List under this folder, or the tenant's root folders when `None`.
    pub parent_id: Option<FolderId>,
    /// Levels to materialize, clamped to 1..=5.
    #[serde(default = "default_depth")]
    pub depth: u32,
    /// Whether folders with no files and no subfolders are listed.
    #[serde(default = "default_include_empty")]
    pub include_empty: bool,
}

fn default_depth() -> u32 {
    1
}

fn default_include_empty() -> bool {
    true
}

impl Default for TreeQuery {
    fn default() -> Self {
        Self {
            parent_id: None,
            depth: default_depth(),
            include_empty: default_include_empty(),
        }
    }
}

/// Builds folder trees with per-folder file and subfolder statistics.
#[derive(Debug, Clone)]
pub struct TreeService {
    /// Folder repository.
    folders: Arc<dyn FolderRepository>,
    /// File repository.
    files: Arc<dyn FileRepository>,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(folders: Arc<dyn FolderRepository>, files: Arc<dyn FileRepository>) -> Self {
        Self { folders, files }
    }

    /// Lists a folder tree.
    ///
    /// Issues one child listing and one file listing per visited folder.
    /// With `include_empty` off, an empty folder is skipped together with
    /// everything under it.
    pub async fn list_tree(
        &self,
        ctx: &RequestContext,
        query: TreeQuery,
    ) -> AppResult<Vec<FolderDetail>> {
        let depth = query.depth.clamp(MIN_TREE_DEPTH, MAX_TREE_DEPTH);

        let mut level: Vec<Folder> = match query.parent_id {
            Some(parent_id) => {
                lookup::active_folder(ctx, self.folders.as_ref(), parent_id).await?;
                ctx.guard(self.folders.find_by_parent(parent_id)).await?
            }
            None => ctx
                .guard(self.folders.find_by_tenant(ctx.tenant_id))
                .await?
                .into_iter()
                .filter(Folder::is_root)
                .collect(),
        };
        level.retain(|f| f.is_active() && f.tenant_id == ctx.tenant_id);
        level.sort_by(|a, b| a.name.cmp(&b.name));

        let tree = self
            .build_level(ctx, level, depth, query.include_empty)
            .await?;

        debug!(
            tenant_id = %ctx.tenant_id,
            parent_id = ?query.parent_id,
            depth,
            roots = tree.len(),
            "Folder tree listed"
        );
        Ok(tree)
    }

    fn build_level<'a>(
        &'a self,
        ctx: &'a RequestContext,
        folders: Vec<Folder>,
        depth: u32,
        include_empty: bool,
    ) -> BoxFuture<'a, AppResult<Vec<FolderDetail>>> {
        async move {
            let mut details = Vec::with_capacity(folders.len());

            for folder in folders {
                let files = ctx.guard(self.files.find_by_folder(folder.id)).await?;
                let (file_count, total_size) = files
                    .iter()
                    .filter(|f| f.is_active())
                    .fold((0usize, 0i64), |(count, size), f| (count + 1, size + f.size_bytes));

                let mut children: Vec<Folder> = ctx
                    .guard(self.folders.find_by_parent(folder.id))
                    .await?
                    .into_iter()
                    .filter(|c| c.is_active() && c.tenant_id == ctx.tenant_id)
                    .collect();
                children.sort_by(|a, b| a.name.cmp(&b.name));

                let mut detail = FolderDetail::new(&folder, file_count, children.len(), total_size);
                if !include_empty && detail.is_empty() {
                    continue;
                }

                if depth > 1 && !children.is_empty() {
                    detail.children = self
                        .build_level(ctx, children, depth - 1, include_empty)
                        .await?;
                }
                details.push(detail);
            }

            Ok(details)
        }
        .boxed()
    }
}
