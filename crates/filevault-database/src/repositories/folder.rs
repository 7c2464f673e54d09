//! PostgreSQL folder repository.

use async_trait::async_trait;
use sqlx::PgPool;

use filevault_core::error::{AppError, ErrorKind};
use filevault_core::result::AppResult;
use filevault_core::types::{BucketId, FolderId, TenantId};
use filevault_entity::Folder;

use super::FolderRepository;

/// Folder repository backed by the `folders` table.
#[derive(Debug, Clone)]
pub struct PgFolderRepository {
    pool: PgPool,
}

impl PgFolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderRepository for PgFolderRepository {
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    async fn find_by_location(
        &self,
        bucket_id: BucketId,
        path: &str,
        name: &str,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders \
             WHERE bucket_id = $1 AND path = $2 AND name = $3 AND is_deleted = FALSE \
             LIMIT 1",
        )
        .bind(bucket_id)
        .bind(path)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find folder by location", e)
        })
    }

    async fn find_by_bucket(&self, bucket_id: BucketId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE bucket_id = $1 ORDER BY path ASC, name ASC",
        )
        .bind(bucket_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list folders by bucket", e)
        })
    }

    async fn find_by_parent(&self, parent_id: FolderId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE parent_id = $1 ORDER BY name ASC",
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list child folders", e))
    }

    async fn find_by_tenant(&self, tenant_id: TenantId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE tenant_id = $1 ORDER BY path ASC, name ASC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list folders by tenant", e)
        })
    }

    async fn save(&self, folder: &Folder) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO folders \
             (id, tenant_id, bucket_id, parent_id, name, path, is_public, is_deleted, \
              created_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (id) DO UPDATE SET \
             parent_id = EXCLUDED.parent_id, name = EXCLUDED.name, path = EXCLUDED.path, \
             is_public = EXCLUDED.is_public, is_deleted = EXCLUDED.is_deleted, \
             updated_at = EXCLUDED.updated_at",
        )
        .bind(folder.id)
        .bind(folder.tenant_id)
        .bind(folder.bucket_id)
        .bind(folder.parent_id)
        .bind(&folder.name)
        .bind(&folder.path)
        .bind(folder.is_public)
        .bind(folder.is_deleted)
        .bind(folder.created_by)
        .bind(folder.created_at)
        .bind(folder.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save folder", e))?;
        Ok(())
    }

    async fn delete(&self, id: FolderId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete folder", e))?;
        Ok(result.rows_affected() > 0)
    }
}
