//! Explicit path backfill.
//!
//! Renaming or moving a folder only rewrites that folder's own record. This
//! service walks a bucket's tree from the roots and brings every folder
//! path, file folder path and (optionally) object key back in line with
//! the parent chain. It is never run implicitly.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use filevault_core::result::AppResult;
use filevault_core::traits::storage::ObjectStore;
use filevault_core::types::{BucketId, FolderId};
use filevault_database::repositories::{BucketRepository, FileRepository, FolderRepository};
use filevault_entity::Folder;

use crate::context::RequestContext;
use crate::file::persist;
use crate::file::relocation::Relocator;
use crate::lookup;

/// Outcome of a backfill run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillReport {
    /// Active folders reached from a root.
    pub folders_scanned: usize,
    /// Folders whose path was rewritten.
    pub folders_updated: usize,
    /// Files whose record was rewritten.
    pub files_updated: usize,
    /// Files whose object was moved to a new key.
    pub objects_relocated: usize,
    /// Active folders not reachable from a root (missing or deleted parent,
    /// or a cycle). Left untouched, as are their files.
    pub orphans: Vec<FolderId>,
}

/// Recomputes denormalized paths and keys for a bucket.
#[derive(Debug, Clone)]
pub struct PathRepairService {
    folders: Arc<dyn FolderRepository>,
    files: Arc<dyn FileRepository>,
    buckets: Arc<dyn BucketRepository>,
    objects: Arc<dyn ObjectStore>,
    relocator: Relocator,
}

impl PathRepairService {
    /// Creates a new path repair service.
    pub fn new(
        folders: Arc<dyn FolderRepository>,
        files: Arc<dyn FileRepository>,
        buckets: Arc<dyn BucketRepository>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            relocator: Relocator::new(Arc::clone(&objects)),
            folders,
            files,
            buckets,
            objects,
        }
    }

    /// Rewrites stale paths in a bucket. With `relocate_objects`, files whose
    /// key no longer matches their location are relocated as well.
    pub async fn backfill(
        &self,
        ctx: &RequestContext,
        bucket_id: BucketId,
        relocate_objects: bool,
    ) -> AppResult<BackfillReport> {
        let bucket = lookup::owned_bucket(ctx, self.buckets.as_ref(), bucket_id).await?;
        let mut report = BackfillReport::default();

        let mut folders: HashMap<FolderId, Folder> = ctx
            .guard(self.folders.find_by_bucket(bucket_id))
            .await?
            .into_iter()
            .filter(|f| f.is_active() && f.tenant_id == ctx.tenant_id)
            .map(|f| (f.id, f))
            .collect();

        let mut children: HashMap<Option<FolderId>, Vec<(String, FolderId)>> = HashMap::new();
        for folder in folders.values() {
            children
                .entry(folder.parent_id)
                .or_default()
                .push((folder.name.clone(), folder.id));
        }
        for siblings in children.values_mut() {
            siblings.sort();
        }

        let mut locations: HashMap<FolderId, String> = HashMap::new();
        let mut visited: HashSet<FolderId> = HashSet::new();
        let mut queue: VecDeque<(FolderId, String)> = children
            .get(&None)
            .into_iter()
            .flatten()
            .map(|(_, id)| (*id, String::new()))
            .collect();

        while let Some((id, expected_path)) = queue.pop_front() {
            if !visited.insert(id) {
                continue;
            }
            let Some(folder) = folders.get_mut(&id) else {
                continue;
            };
            report.folders_scanned += 1;

            if folder.path != expected_path {
                folder.path = expected_path;
                folder.touch();
                ctx.guard(self.folders.save(folder)).await?;
                report.folders_updated += 1;
            }

            let location = folder.full_location();
            for (_, child) in children.get(&Some(id)).into_iter().flatten() {
                queue.push_back((*child, location.clone()));
            }
            locations.insert(id, location);
        }

        report.orphans = folders
            .keys()
            .filter(|id| !visited.contains(id))
            .copied()
            .collect();
        report.orphans.sort();
        if !report.orphans.is_empty() {
            warn!(
                bucket_id = %bucket_id,
                orphans = report.orphans.len(),
                "Folders unreachable from a root were skipped"
            );
        }

        let files = ctx.guard(self.files.find_by_bucket(bucket_id)).await?;
        for mut file in files
            .into_iter()
            .filter(|f| f.is_active() && f.tenant_id == ctx.tenant_id)
        {
            let expected_path = match file.folder_id {
                None => None,
                Some(folder_id) => match locations.get(&folder_id) {
                    Some(location) => Some(location.clone()),
                    None => continue,
                },
            };

            let mut changed = false;
            if file.folder_path() != expected_path.as_deref() {
                file.folder_path = expected_path;
                changed = true;
            }

            let mut relocated = false;
            if relocate_objects {
                let new_key = file.expected_key();
                if new_key != file.object_key {
                    self.relocator
                        .relocate(
                            ctx,
                            &bucket.name,
                            &file.object_key,
                            &new_key,
                            &file.content_type,
                            file.is_public,
                        )
                        .await?;
                    file.public_url = file
                        .is_public
                        .then(|| self.objects.public_url(&bucket.name, &new_key));
                    file.object_key = new_key;
                    report.objects_relocated += 1;
                    relocated = true;
                    changed = true;
                }
            }

            if changed {
                file.touch();
                persist(ctx, self.files.as_ref(), &file, relocated).await?;
                report.files_updated += 1;
            }
        }

        info!(
            tenant_id = %ctx.tenant_id,
            bucket_id = %bucket_id,
            folders_scanned = report.folders_scanned,
            folders_updated = report.folders_updated,
            files_updated = report.files_updated,
            objects_relocated = report.objects_relocated,
            "Path backfill completed"
        );
        Ok(report)
    }
}
