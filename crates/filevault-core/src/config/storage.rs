//! Object storage configuration.

use serde::{Deserialize, Serialize};

/// Which object store backs the containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageProviderKind {
    /// One directory per container under `local.root_path`.
    Local,
    /// Process-local maps; contents are lost on restart.
    Memory,
    /// Amazon S3 or an S3-compatible endpoint (requires the `s3` feature).
    S3,
}

/// How the key of a freshly uploaded object is laid out.
///
/// Relocations always use [`KeyLayout::IdQualified`]; the name-only form
/// can collide when two files of the same name land in the same folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeyLayout {
    /// `{folder}/{file_id}/{name}`.
    #[default]
    IdQualified,
    /// `{folder}/{name}`.
    NameOnly,
}

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Object store provider.
    #[serde(default = "default_provider")]
    pub provider: StorageProviderKind,
    /// Key layout used at upload time.
    #[serde(default)]
    pub key_layout: KeyLayout,
    /// Maximum upload size in bytes (default 100 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Lifetime of generated download links, in seconds.
    #[serde(default = "default_download_url_ttl")]
    pub download_url_ttl_secs: u64,
    /// Overrides the derived public URL base (`{base}/{container}/{key}`).
    #[serde(default)]
    pub public_base_url: Option<String>,
    /// Local filesystem storage configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
    /// S3-compatible storage configuration.
    #[serde(default)]
    pub s3: S3StorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            key_layout: KeyLayout::default(),
            max_upload_size_bytes: default_max_upload(),
            download_url_ttl_secs: default_download_url_ttl(),
            public_base_url: None,
            local: LocalStorageConfig::default(),
            s3: S3StorageConfig::default(),
        }
    }
}

/// Local filesystem storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root path; each container is a sub-directory.
    #[serde(default = "default_local_root")]
    pub root_path: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
        }
    }
}

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StorageConfig {
    /// S3 endpoint URL (for non-AWS services like MinIO).
    #[serde(default)]
    pub endpoint: Option<String>,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Access key ID. Falls back to the default credential chain when unset.
    #[serde(default)]
    pub access_key: Option<String>,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Use path-style addressing (required by most S3-compatible servers).
    #[serde(default)]
    pub force_path_style: bool,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: default_region(),
            access_key: None,
            secret_key: None,
            force_path_style: false,
        }
    }
}

fn default_provider() -> StorageProviderKind {
    StorageProviderKind::Local
}

fn default_max_upload() -> u64 {
    104_857_600 // 100 MB
}

fn default_download_url_ttl() -> u64 {
    3600
}

fn default_local_root() -> String {
    "./data/objects".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}
