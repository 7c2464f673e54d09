//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Duration;

use filevault_core::config::AppConfig;
use filevault_core::traits::storage::ObjectStore;
use filevault_database::MetadataStore;
use filevault_service::file::{DownloadService, FileService, UploadService};
use filevault_service::folder::{PathRepairService, TreeService};
use filevault_service::{BucketService, FolderService};

/// Application state containing all shared dependencies.
///
/// Cloned into every handler via Axum's `State` extractor; every field is
/// reference-counted.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Metadata repositories.
    pub metadata: MetadataStore,
    /// Object store backend.
    pub objects: Arc<dyn ObjectStore>,

    /// Bucket management.
    pub bucket_service: Arc<BucketService>,
    /// Folder CRUD and moves.
    pub folder_service: Arc<FolderService>,
    /// Folder tree listings.
    pub tree_service: Arc<TreeService>,
    /// Path backfill.
    pub repair_service: Arc<PathRepairService>,
    /// File placement.
    pub file_service: Arc<FileService>,
    /// File uploads.
    pub upload_service: Arc<UploadService>,
    /// File downloads.
    pub download_service: Arc<DownloadService>,
}

impl AppState {
    /// Wires every service onto the given stores.
    pub fn new(config: AppConfig, metadata: MetadataStore, objects: Arc<dyn ObjectStore>) -> Self {
        let folders = Arc::clone(&metadata.folders);
        let files = Arc::clone(&metadata.files);
        let buckets = Arc::clone(&metadata.buckets);

        let bucket_service = Arc::new(BucketService::new(
            Arc::clone(&buckets),
            Arc::clone(&objects),
        ));
        let folder_service = Arc::new(FolderService::new(
            Arc::clone(&folders),
            Arc::clone(&buckets),
        ));
        let tree_service = Arc::new(TreeService::new(Arc::clone(&folders), Arc::clone(&files)));
        let repair_service = Arc::new(PathRepairService::new(
            Arc::clone(&folders),
            Arc::clone(&files),
            Arc::clone(&buckets),
            Arc::clone(&objects),
        ));
        let file_service = Arc::new(FileService::new(
            Arc::clone(&files),
            Arc::clone(&folders),
            Arc::clone(&buckets),
            Arc::clone(&objects),
        ));
        let upload_service = Arc::new(UploadService::new(
            Arc::clone(&files),
            Arc::clone(&folders),
            Arc::clone(&buckets),
            Arc::clone(&objects),
            config.storage.clone(),
        ));
        let download_service = Arc::new(DownloadService::new(
            files,
            buckets,
            Arc::clone(&objects),
            Duration::from_secs(config.storage.download_url_ttl_secs),
        ));

        Self {
            config: Arc::new(config),
            metadata,
            objects,
            bucket_service,
            folder_service,
            tree_service,
            repair_service,
            file_service,
            upload_service,
            download_service,
        }
    }
}
