use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use etl_config::shared::StorageConfig;
use tracing::{debug, info};

use crate::error::{ErrorKind, EtlResult};
use crate::etl_error;
use crate::storage::ObjectStorage;

/// [`ObjectStorage`] backed by Amazon S3 or an S3-compatible endpoint.
#[derive(Debug, Clone)]
pub struct S3ObjectStorage {
    client: Client,
}

impl S3ObjectStorage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the default AWS provider chain, applying the configured region and
    /// endpoint. A custom endpoint switches to path-style addressing.
    pub async fn from_config(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.endpoint.is_some())
            .build();

        info!(
            region = ?config.region,
            endpoint = ?config.endpoint,
            "created s3 client"
        );

        Self::new(Client::from_conf(s3_config))
    }
}

impl ObjectStorage for S3ObjectStorage {
    async fn list_buckets(&self) -> EtlResult<Vec<String>> {
        let output = self.client.list_buckets().send().await.map_err(|err| {
            etl_error!(
                ErrorKind::StorageIoError,
                "Listing S3 buckets failed",
                DisplayErrorContext(&err)
            )
        })?;

        Ok(output
            .buckets()
            .iter()
            .filter_map(|bucket| bucket.name().map(str::to_string))
            .collect())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> EtlResult<Option<Bytes>> {
        debug!(bucket, key, "downloading object from s3");

        let output = match self.client.get_object().bucket(bucket).key(key).send().await {
            Ok(output) => output,
            Err(err) => {
                if err
                    .as_service_error()
                    .is_some_and(|service_err| service_err.is_no_such_key())
                {
                    return Ok(None);
                }

                return Err(etl_error!(
                    ErrorKind::StorageIoError,
                    "Downloading S3 object failed",
                    format!("s3://{bucket}{key}: {}", DisplayErrorContext(&err))
                ));
            }
        };

        let body = output.body.collect().await.map_err(|err| {
            etl_error!(
                ErrorKind::StorageIoError,
                "Reading S3 object body failed",
                format!("s3://{bucket}{key}: {err}")
            )
        })?;

        Ok(Some(body.into_bytes()))
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> EtlResult<()> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|err| {
                etl_error!(
                    ErrorKind::StorageIoError,
                    "Uploading S3 object failed",
                    format!("s3://{bucket}{key}: {}", DisplayErrorContext(&err))
                )
            })?;

        debug!(bucket, key, bytes = size, "uploaded object to s3");

        Ok(())
    }
}
