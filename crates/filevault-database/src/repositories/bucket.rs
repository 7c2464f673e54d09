//! PostgreSQL bucket repository.

use async_trait::async_trait;
use sqlx::PgPool;

use filevault_core::error::{AppError, ErrorKind};
use filevault_core::result::AppResult;
use filevault_core::types::{BucketId, TenantId};
use filevault_entity::Bucket;

use super::BucketRepository;

/// Bucket repository backed by the `buckets` table.
#[derive(Debug, Clone)]
pub struct PgBucketRepository {
    pool: PgPool,
}

impl PgBucketRepository {
    /// Create a new bucket repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BucketRepository for PgBucketRepository {
    async fn find_by_id(&self, id: BucketId) -> AppResult<Option<Bucket>> {
        sqlx::query_as::<_, Bucket>("SELECT * FROM buckets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find bucket", e))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Bucket>> {
        sqlx::query_as::<_, Bucket>("SELECT * FROM buckets WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find bucket by name", e)
            })
    }

    async fn find_by_tenant(&self, tenant_id: TenantId) -> AppResult<Vec<Bucket>> {
        sqlx::query_as::<_, Bucket>("SELECT * FROM buckets WHERE tenant_id = $1 ORDER BY name ASC")
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list buckets", e))
    }

    async fn save(&self, bucket: &Bucket) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO buckets \
             (id, tenant_id, name, region, is_public, status, created_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (id) DO UPDATE SET \
             region = EXCLUDED.region, is_public = EXCLUDED.is_public, \
             status = EXCLUDED.status, updated_at = EXCLUDED.updated_at",
        )
        .bind(bucket.id)
        .bind(bucket.tenant_id)
        .bind(&bucket.name)
        .bind(&bucket.region)
        .bind(bucket.is_public)
        .bind(bucket.status)
        .bind(bucket.created_by)
        .bind(bucket.created_at)
        .bind(bucket.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return AppError::conflict(format!("Bucket '{}' already exists", bucket.name));
                }
            }
            AppError::with_source(ErrorKind::Database, "Failed to save bucket", e)
        })?;
        Ok(())
    }
}
