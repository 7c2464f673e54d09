//! Amazon S3 (and S3-compatible) object store.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::types::{
    BucketCannedAcl, BucketLocationConstraint, CreateBucketConfiguration, ObjectCannedAcl,
};
use bytes::Bytes;
use tokio_util::io::ReaderStream;
use tracing::{debug, error, info};

use filevault_core::config::storage::S3StorageConfig;
use filevault_core::error::{AppError, ErrorKind};
use filevault_core::result::AppResult;
use filevault_core::traits::storage::{ByteStream, ObjectStore, collect_stream};

use crate::public_url::PublicUrlScheme;

/// Region that rejects an explicit location constraint on bucket creation.
const DEFAULT_REGION: &str = "us-east-1";

/// S3 object store. Containers are S3 buckets.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    region: String,
    urls: PublicUrlScheme,
}

impl S3ObjectStore {
    /// Build a client from the storage configuration.
    ///
    /// Static credentials are used when both keys are configured; otherwise
    /// the default AWS credential chain applies.
    pub async fn new(config: &S3StorageConfig, public_base_url: Option<&str>) -> AppResult<Self> {
        info!(
            endpoint = config.endpoint.as_deref().unwrap_or("aws"),
            region = %config.region,
            "Initializing S3 object store"
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint.clone());
        }
        if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
            loader = loader.credentials_provider(Credentials::new(
                access_key.clone(),
                secret_key.clone(),
                None,
                None,
                "filevault-config",
            ));
        }

        let shared = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.force_path_style)
            .build();

        Ok(Self {
            client: Client::from_conf(s3_config),
            region: config.region.clone(),
            urls: PublicUrlScheme::resolve(
                public_base_url,
                config.endpoint.as_deref(),
                &config.region,
            ),
        })
    }

    fn object_acl(is_public: bool) -> ObjectCannedAcl {
        if is_public {
            ObjectCannedAcl::PublicRead
        } else {
            ObjectCannedAcl::Private
        }
    }
}

fn storage_error(message: String, err: impl std::error::Error + Send + Sync + 'static) -> AppError {
    AppError::with_source(
        ErrorKind::Storage,
        format!("{message}: {}", DisplayErrorContext(&err)),
        err,
    )
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.client
            .list_buckets()
            .send()
            .await
            .map(|_| true)
            .map_err(|e| storage_error("S3 health check failed".to_string(), e))
    }

    async fn create_container(&self, container: &str, is_public: bool) -> AppResult<()> {
        let mut request = self.client.create_bucket().bucket(container);
        if self.region != DEFAULT_REGION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }
        if is_public {
            request = request.acl(BucketCannedAcl::PublicRead);
        }

        match request.send().await {
            Ok(_) => {
                info!(container, region = %self.region, "Created S3 bucket");
                Ok(())
            }
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_bucket_already_owned_by_you()) =>
            {
                debug!(container, "S3 bucket already exists");
                Ok(())
            }
            Err(e) => Err(storage_error(format!("Failed to create bucket {container}"), e)),
        }
    }

    async fn container_exists(&self, container: &str) -> AppResult<bool> {
        match self.client.head_bucket().bucket(container).send().await {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => Ok(false),
            Err(e) => Err(storage_error(format!("Failed to check bucket {container}"), e)),
        }
    }

    async fn put(
        &self,
        container: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
        is_public: bool,
    ) -> AppResult<()> {
        let size = data.len();
        let start = Instant::now();

        self.client
            .put_object()
            .bucket(container)
            .key(key)
            .content_type(content_type)
            .acl(Self::object_acl(is_public))
            .body(aws_sdk_s3::primitives::ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                error!(
                    bucket = %container,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "S3 upload failed"
                );
                storage_error(format!("Failed to upload {container}/{key}"), e)
            })?;

        debug!(
            bucket = %container,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_millis() as u64,
            "S3 upload successful"
        );
        Ok(())
    }

    async fn put_stream(
        &self,
        container: &str,
        key: &str,
        stream: ByteStream,
        content_type: &str,
        is_public: bool,
    ) -> AppResult<u64> {
        // PutObject needs a known content length.
        let data = collect_stream(stream).await?;
        let len = data.len() as u64;
        self.put(container, key, data, content_type, is_public).await?;
        Ok(len)
    }

    async fn get(&self, container: &str, key: &str) -> AppResult<Option<ByteStream>> {
        match self.client.get_object().bucket(container).key(key).send().await {
            Ok(output) => {
                let stream: ByteStream = Box::pin(ReaderStream::new(output.body.into_async_read()));
                Ok(Some(stream))
            }
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => Ok(None),
            Err(e) => Err(storage_error(format!("Failed to download {container}/{key}"), e)),
        }
    }

    async fn delete(&self, container: &str, key: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(container)
            .key(key)
            .send()
            .await
            .map_err(|e| storage_error(format!("Failed to delete {container}/{key}"), e))?;
        debug!(bucket = %container, key = %key, "S3 object deleted");
        Ok(())
    }

    async fn exists(&self, container: &str, key: &str) -> AppResult<bool> {
        match self.client.head_object().bucket(container).key(key).send().await {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => Ok(false),
            Err(e) => Err(storage_error(format!("Failed to check {container}/{key}"), e)),
        }
    }

    async fn set_visibility(&self, container: &str, key: &str, is_public: bool) -> AppResult<()> {
        self.client
            .put_object_acl()
            .bucket(container)
            .key(key)
            .acl(Self::object_acl(is_public))
            .send()
            .await
            .map_err(|e| storage_error(format!("Failed to set ACL on {container}/{key}"), e))?;
        Ok(())
    }

    fn public_url(&self, container: &str, key: &str) -> String {
        self.urls.url(container, key)
    }

    async fn presigned_url(&self, container: &str, key: &str, ttl: Duration) -> AppResult<String> {
        let presigning = PresigningConfig::expires_in(ttl).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid presign lifetime", e)
        })?;

        let request = self
            .client
            .get_object()
            .bucket(container)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| storage_error(format!("Failed to presign {container}/{key}"), e))?;

        Ok(request.uri().to_string())
    }
}
