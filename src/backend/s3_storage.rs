// cabindesk/src/backend/s3_storage.rs
use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::config::Region;
use s3::error::DisplayErrorContext;
use s3::primitives::ByteStream;
use tracing::{debug, info};

use super::{BackendError, PhotoBucket};
use crate::cabins::PhotoUpload;
use crate::config::StorageConfig;

/// Cabin photo container on an S3-compatible object store.
#[derive(Clone)]
pub struct S3PhotoBucket {
    client: s3::Client,
    bucket_name: String,
}

impl S3PhotoBucket {
    pub async fn connect(storage: &StorageConfig) -> Self {
        let sdk_config = aws_config::defaults(s3::config::BehaviorVersion::latest())
            .endpoint_url(&storage.endpoint_url)
            .region(Region::new(storage.region.clone()))
            .credentials_provider(s3::config::Credentials::new(
                &storage.access_key_id,
                &storage.secret_access_key,
                None, // session_token
                None, // expiry
                "Static",
            ))
            .load()
            .await;

        // Hosted storage gateways address buckets by path, not by subdomain.
        let s3_config = s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        info!(
            endpoint = %storage.endpoint_url,
            bucket = %storage.bucket_name,
            "Photo storage client ready"
        );
        Self {
            client: s3::Client::from_conf(s3_config),
            bucket_name: storage.bucket_name.clone(),
        }
    }
}

#[async_trait]
impl PhotoBucket for S3PhotoBucket {
    async fn upload(&self, blob_name: &str, photo: &PhotoUpload) -> Result<(), BackendError> {
        debug!(bucket = %self.bucket_name, key = blob_name, bytes = photo.bytes.len(), "uploading photo");
        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(blob_name)
            .content_type(&photo.content_type)
            .body(ByteStream::from(photo.bytes.clone()))
            .send()
            .await
            .map_err(|e| {
                BackendError::Storage(format!(
                    "failed to upload {} to bucket {}: {}",
                    blob_name,
                    self.bucket_name,
                    DisplayErrorContext(e)
                ))
            })?;
        Ok(())
    }

    async fn remove(&self, blob_name: &str) -> Result<(), BackendError> {
        debug!(bucket = %self.bucket_name, key = blob_name, "removing photo");
        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(blob_name)
            .send()
            .await
            .map_err(|e| {
                BackendError::Storage(format!(
                    "failed to remove {} from bucket {}: {}",
                    blob_name,
                    self.bucket_name,
                    DisplayErrorContext(e)
                ))
            })?;
        Ok(())
    }
}
