//! Builds the object store named in the configuration.

use std::sync::Arc;

use tracing::info;

use filevault_core::config::{StorageConfig, StorageProviderKind};
use filevault_core::result::AppResult;
use filevault_core::traits::storage::ObjectStore;

use crate::providers::{LocalObjectStore, MemoryObjectStore};

/// Create the configured object store.
pub async fn build_object_store(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    let public_base = config.public_base_url.as_deref();

    let store: Arc<dyn ObjectStore> = match config.provider {
        StorageProviderKind::Local => {
            Arc::new(LocalObjectStore::new(&config.local.root_path, public_base).await?)
        }
        StorageProviderKind::Memory => Arc::new(MemoryObjectStore::new(
            public_base.unwrap_or("memory://objects"),
        )),
        #[cfg(feature = "s3")]
        StorageProviderKind::S3 => Arc::new(
            crate::providers::S3ObjectStore::new(&config.s3, public_base).await?,
        ),
        #[cfg(not(feature = "s3"))]
        StorageProviderKind::S3 => {
            return Err(filevault_core::error::AppError::configuration(
                "S3 object store not available (s3 feature not enabled)",
            ));
        }
    };

    info!(provider = store.provider_type(), "Object store ready");
    Ok(store)
}
