//! Shared test helpers for integration tests.
//!
//! Every test runs against the in-memory metadata store and the in-memory
//! object store, wired through the same `AppState` the server uses.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use bytes::Bytes;
use serde_json::Value;
use tower::ServiceExt;

use filevault_api::{AppState, build_app};
use filevault_core::config::{AppConfig, DatabaseProvider, KeyLayout, StorageProviderKind};
use filevault_core::types::{BucketId, FolderId, TenantId, UserId};
use filevault_database::{MemoryMetadataStore, MetadataStore};
use filevault_entity::{Bucket, File, Folder};
use filevault_service::RequestContext;
use filevault_service::bucket::CreateBucketRequest;
use filevault_service::file::UploadRequest;
use filevault_service::folder::CreateFolderRequest;
use filevault_storage::MemoryObjectStore;

/// Test application context
pub struct TestApp {
    /// Fully wired services
    pub state: AppState,
    /// Direct handle on the metadata maps
    pub metadata: MemoryMetadataStore,
    /// Direct handle on the object store, for call counts and key listings
    pub objects: MemoryObjectStore,
    /// Tenant used by `ctx()`
    pub tenant_id: TenantId,
    /// User used by `ctx()`
    pub user_id: UserId,
}

impl TestApp {
    /// Create a new test application with the id-qualified key layout
    pub fn new() -> Self {
        Self::with_layout(KeyLayout::IdQualified)
    }

    /// Create a new test application with the given upload key layout
    pub fn with_layout(layout: KeyLayout) -> Self {
        Self::with_config(|config| config.storage.key_layout = layout)
    }

    /// Create a new test application on memory backends, with further
    /// configuration applied by `configure`
    pub fn with_config(configure: impl FnOnce(&mut AppConfig)) -> Self {
        let mut config = AppConfig::default();
        config.database.provider = DatabaseProvider::Memory;
        config.storage.provider = StorageProviderKind::Memory;
        configure(&mut config);

        let metadata = MemoryMetadataStore::new();
        let objects = MemoryObjectStore::default();
        let state = AppState::new(
            config,
            MetadataStore::memory(metadata.clone()),
            Arc::new(objects.clone()),
        );

        Self {
            state,
            metadata,
            objects,
            tenant_id: TenantId::new(),
            user_id: UserId::new(),
        }
    }

    /// Request context of the default tenant
    pub fn ctx(&self) -> RequestContext {
        RequestContext::new(self.tenant_id, self.user_id)
    }

    /// Request context of an unrelated tenant
    pub fn other_ctx(&self) -> RequestContext {
        RequestContext::new(TenantId::new(), UserId::new())
    }

    /// The HTTP router over the same state
    pub fn router(&self) -> Router {
        build_app(self.state.clone())
    }

    /// Create a bucket for the default tenant
    pub async fn bucket(&self, name: &str) -> Bucket {
        self.state
            .bucket_service
            .create_bucket(
                &self.ctx(),
                CreateBucketRequest {
                    name: name.to_string(),
                    is_public: false,
                    region: None,
                },
            )
            .await
            .expect("create bucket")
    }

    /// Create a folder for the default tenant
    pub async fn folder(&self, bucket_id: BucketId, parent_id: Option<FolderId>, name: &str) -> Folder {
        self.state
            .folder_service
            .create_folder(
                &self.ctx(),
                CreateFolderRequest {
                    bucket_id,
                    parent_id,
                    name: name.to_string(),
                    is_public: false,
                },
            )
            .await
            .expect("create folder")
    }

    /// Upload a file for the default tenant
    pub async fn upload(
        &self,
        bucket_id: BucketId,
        folder_id: Option<FolderId>,
        name: &str,
        data: &'static [u8],
    ) -> File {
        self.state
            .upload_service
            .upload(
                &self.ctx(),
                UploadRequest {
                    bucket_id,
                    folder_id,
                    file_name: name.to_string(),
                    content_type: Some("application/pdf".to_string()),
                    data: Bytes::from_static(data),
                    is_public: false,
                },
            )
            .await
            .expect("upload")
    }

    /// Send a request through the router and decode the JSON response
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        tenant: Option<TenantId>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(tenant) = tenant {
            builder = builder
                .header("x-tenant-id", tenant.to_string())
                .header("x-user-id", self.user_id.to_string());
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self.router().oneshot(request).await.expect("router");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Test response
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response body as JSON
    pub body: Value,
}
