//! PostgreSQL file repository.

use async_trait::async_trait;
use sqlx::PgPool;

use filevault_core::error::{AppError, ErrorKind};
use filevault_core::result::AppResult;
use filevault_core::types::{BucketId, FileId, FolderId, TenantId};
use filevault_entity::File;

use super::FileRepository;

/// File repository backed by the `files` table.
#[derive(Debug, Clone)]
pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn find_by_bucket(&self, bucket_id: BucketId) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE bucket_id = $1 ORDER BY created_at DESC",
        )
        .bind(bucket_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files by bucket", e))
    }

    async fn find_by_folder(&self, folder_id: FolderId) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE folder_id = $1 ORDER BY name ASC")
            .bind(folder_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list files by folder", e)
            })
    }

    async fn find_by_tenant(&self, tenant_id: TenantId) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE tenant_id = $1 ORDER BY created_at DESC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files by tenant", e))
    }

    async fn save(&self, file: &File) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO files \
             (id, tenant_id, bucket_id, folder_id, folder_path, name, object_key, content_type, \
              size_bytes, is_public, public_url, is_deleted, uploaded_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             ON CONFLICT (id) DO UPDATE SET \
             folder_id = EXCLUDED.folder_id, folder_path = EXCLUDED.folder_path, \
             name = EXCLUDED.name, object_key = EXCLUDED.object_key, \
             content_type = EXCLUDED.content_type, size_bytes = EXCLUDED.size_bytes, \
             is_public = EXCLUDED.is_public, public_url = EXCLUDED.public_url, \
             is_deleted = EXCLUDED.is_deleted, updated_at = EXCLUDED.updated_at",
        )
        .bind(file.id)
        .bind(file.tenant_id)
        .bind(file.bucket_id)
        .bind(file.folder_id)
        .bind(&file.folder_path)
        .bind(&file.name)
        .bind(&file.object_key)
        .bind(&file.content_type)
        .bind(file.size_bytes)
        .bind(file.is_public)
        .bind(&file.public_url)
        .bind(file.is_deleted)
        .bind(file.uploaded_by)
        .bind(file.created_at)
        .bind(file.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save file", e))?;
        Ok(())
    }

    async fn delete(&self, id: FileId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }
}
