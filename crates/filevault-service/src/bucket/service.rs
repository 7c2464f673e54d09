//! Bucket creation and lookup.
//!
//! A bucket is a metadata record paired with an object-store container of
//! the same name. Bucket names are global across tenants.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use filevault_core::error::AppError;
use filevault_core::result::AppResult;
use filevault_core::traits::storage::ObjectStore;
use filevault_core::types::BucketId;
use filevault_database::repositories::BucketRepository;
use filevault_entity::Bucket;

use crate::context::RequestContext;
use crate::lookup;
use crate::validation::{ensure, validate_bucket_name};

/// Manages buckets.
#[derive(Debug, Clone)]
pub struct BucketService {
    /// Bucket repository.
    buckets: Arc<dyn BucketRepository>,
    /// Object store.
    objects: Arc<dyn ObjectStore>,
}

/// Request to create a bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBucketRequest {
    /// Bucket and container name.
    pub name: String,
    /// Public visibility flag.
    #[serde(default)]
    pub is_public: bool,
    /// Region hint recorded with the bucket.
    pub region: Option<String>,
}

impl BucketService {
    /// Creates a new bucket service.
    pub fn new(buckets: Arc<dyn BucketRepository>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { buckets, objects }
    }

    /// Creates the container, then the bucket record.
    pub async fn create_bucket(
        &self,
        ctx: &RequestContext,
        req: CreateBucketRequest,
    ) -> AppResult<Bucket> {
        let name = req.name.trim().to_string();
        ensure(validate_bucket_name(&name))?;

        if ctx.guard(self.buckets.find_by_name(&name)).await?.is_some() {
            warn!(tenant_id = %ctx.tenant_id, bucket = %name, "Bucket name already taken");
            return Err(AppError::conflict(format!("Bucket '{name}' already exists")));
        }

        ctx.guard(self.objects.create_container(&name, req.is_public))
            .await?;

        let bucket = Bucket::new(ctx.tenant_id, name, req.region, req.is_public, ctx.user_id);
        ctx.guard(self.buckets.save(&bucket)).await?;

        info!(
            tenant_id = %ctx.tenant_id,
            user_id = %ctx.user_id,
            bucket_id = %bucket.id,
            bucket = %bucket.name,
            provider = self.objects.provider_type(),
            "Bucket created"
        );
        Ok(bucket)
    }

    /// Gets a bucket of the caller's tenant.
    pub async fn get_bucket(&self, ctx: &RequestContext, bucket_id: BucketId) -> AppResult<Bucket> {
        lookup::owned_bucket(ctx, self.buckets.as_ref(), bucket_id).await
    }

    /// Lists the caller's buckets, by name.
    pub async fn list_buckets(&self, ctx: &RequestContext) -> AppResult<Vec<Bucket>> {
        ctx.guard(self.buckets.find_by_tenant(ctx.tenant_id)).await
    }
}
