//! S3 object store backed by the AWS SDK
//!
//! Credentials and region come from the ambient AWS configuration
//! (environment, shared config files, instance metadata). The `[s3]` config
//! section can pin a region or profile and point at an S3-compatible
//! endpoint.

use super::RemoteStore;
use crate::config::schema::S3Config;
use crate::error::{CacheError, CacheResult};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::StorageClass;
use aws_sdk_s3::Client;
use tracing::{debug, info};

/// S3 implementation of [`RemoteStore`]
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Wrap an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the ambient AWS configuration plus overrides
    pub async fn from_config(config: &S3Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint_url {
            debug!("Using custom S3 endpoint {}", endpoint);
            builder = builder.endpoint_url(endpoint);
        }
        if config.force_path_style {
            builder = builder.force_path_style(true);
        }

        Self::new(Client::from_conf(builder.build()))
    }
}

#[async_trait]
impl RemoteStore for S3Store {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        storage_class: Option<&str>,
    ) -> CacheResult<()> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .set_storage_class(storage_class.map(StorageClass::from))
            .send()
            .await
            .map_err(|e| CacheError::remote("put", bucket, key, DisplayErrorContext(&e)))?;

        info!("Uploaded {} bytes to s3://{}/{}", size, bucket, key);
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> CacheResult<Vec<u8>> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| CacheError::remote("get", bucket, key, DisplayErrorContext(&e)))?;

        if let Some(length) = output.content_length() {
            debug!("Object s3://{}/{} reports {} bytes", bucket, key, length);
        }

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| CacheError::remote("get", bucket, key, e))?
            .into_bytes()
            .to_vec();

        info!("Downloaded {} bytes from s3://{}/{}", data.len(), bucket, key);
        Ok(data)
    }

    async fn exists(&self, bucket: &str, key: &str) -> CacheResult<bool> {
        match self.client.head_object().bucket(bucket).key(key).send().await {
            Ok(_) => Ok(true),
            Err(err) if err.as_service_error().is_some_and(HeadObjectError::is_not_found) => {
                debug!("Object s3://{}/{} does not exist", bucket, key);
                Ok(false)
            }
            Err(err) => Err(CacheError::remote(
                "retrieve metadata for",
                bucket,
                key,
                DisplayErrorContext(&err),
            )),
        }
    }

    async fn delete(&self, bucket: &str, key: &str) -> CacheResult<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| CacheError::remote("delete", bucket, key, DisplayErrorContext(&e)))?;

        info!("Deleted s3://{}/{}", bucket, key);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
