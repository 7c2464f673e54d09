//! Wiring of the repository trait objects for the configured backend.

use std::sync::Arc;

use sqlx::PgPool;

use filevault_core::config::DatabaseConfig;
use filevault_core::result::AppResult;

use crate::connection::{self, Backend};
use crate::memory::MemoryMetadataStore;
use crate::repositories::{
    BucketRepository, FileRepository, FolderRepository, PgBucketRepository, PgFileRepository,
    PgFolderRepository,
};

/// The three repositories the engines are built from.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    /// Folder records.
    pub folders: Arc<dyn FolderRepository>,
    /// File records.
    pub files: Arc<dyn FileRepository>,
    /// Bucket records.
    pub buckets: Arc<dyn BucketRepository>,
    /// Present when backed by PostgreSQL.
    pool: Option<PgPool>,
}

impl MetadataStore {
    /// Connect to the backend named in the configuration.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        Ok(match connection::open(config).await? {
            Backend::Postgres(pool) => Self::postgres(pool),
            Backend::Memory(store) => Self::memory(store),
        })
    }

    /// Repositories on a PostgreSQL pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            folders: Arc::new(PgFolderRepository::new(pool.clone())),
            files: Arc::new(PgFileRepository::new(pool.clone())),
            buckets: Arc::new(PgBucketRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Repositories sharing one in-memory store.
    pub fn memory(store: MemoryMetadataStore) -> Self {
        Self {
            folders: Arc::new(store.clone()),
            files: Arc::new(store.clone()),
            buckets: Arc::new(store),
            pool: None,
        }
    }

    /// Check backend connectivity.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => connection::ping(pool).await,
            None => Ok(true),
        }
    }

    /// Close the PostgreSQL pool, if any.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
