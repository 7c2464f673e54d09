//! Download link value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A URL the caller can fetch the object from directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadLink {
    /// Public or presigned URL.
    pub url: String,
    /// Display name of the file.
    pub file_name: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// When the URL stops working.
    pub expires_at: DateTime<Utc>,
}
