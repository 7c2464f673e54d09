//! Bucket entity model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use filevault_core::AppError;
use filevault_core::types::{BucketId, TenantId, UserId};

/// Lifecycle status of a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "bucket_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BucketStatus {
    /// Accepting uploads.
    Active,
    /// Read-only; kept for existing objects.
    Archived,
}

impl BucketStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for BucketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BucketStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            _ => Err(AppError::validation(format!(
                "Invalid bucket status: '{s}'. Expected one of: active, archived"
            ))),
        }
    }
}

/// A bucket: the object store container a tenant's folders and files live in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Bucket {
    /// Unique bucket identifier.
    pub id: BucketId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Container name in the object store.
    pub name: String,
    /// Region the container was created in, if the backend has regions.
    pub region: Option<String>,
    /// Public-read flag of the container.
    pub is_public: bool,
    /// Lifecycle status.
    pub status: BucketStatus,
    /// Caller that created the bucket.
    pub created_by: UserId,
    /// When the bucket was created.
    pub created_at: DateTime<Utc>,
    /// When the bucket was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Bucket {
    /// Build a new, active bucket record.
    pub fn new(
        tenant_id: TenantId,
        name: impl Into<String>,
        region: Option<String>,
        is_public: bool,
        created_by: UserId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BucketId::new(),
            tenant_id,
            name: name.into(),
            region,
            is_public,
            status: BucketStatus::Active,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether uploads are accepted.
    pub fn is_active(&self) -> bool {
        self.status == BucketStatus::Active
    }
}
