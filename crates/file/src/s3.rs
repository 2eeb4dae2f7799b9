//! S3 object store backed by the AWS SDK

use crate::store::{DeleteAck, ListPage, ListRequest, ObjectStore, ObjectSummary};
use crate::{Error, Result, StorageOperation, DEFAULT_PAGE_SIZE};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use std::path::Path;

/// Bytes left as-is in a `CopySource`: unreserved characters and `/`
const COPY_SOURCE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Connection settings for one bucket
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct S3Config {
    pub bucket: String,
    /// Region override; the AWS default chain is used otherwise
    #[serde(default)]
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible services (MinIO, LocalStack)
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// Page cap assumed by existence checks
    #[serde(default = "default_page_size")]
    pub page_size: i32,
}

fn default_page_size() -> i32 {
    DEFAULT_PAGE_SIZE
}

impl S3Config {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: None,
            endpoint_url: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.bucket.trim().is_empty() {
            return Err(Error::Configuration("bucket name must not be empty".into()));
        }
        if self.page_size <= 0 {
            return Err(Error::Configuration(format!(
                "page_size must be positive, got {}",
                self.page_size
            )));
        }
        Ok(())
    }
}

/// One S3 client bound to one bucket
///
/// Creating a client is relatively expensive, so it is built once and reused
/// for every call made through this store.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    pub async fn connect(config: &S3Config) -> Result<Self> {
        config.validate()?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(ref region) = config.region {
            loader = loader.region(aws_sdk_s3::config::Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let mut s3_config = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(ref endpoint) = config.endpoint_url {
            s3_config = s3_config.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::debug!("Connected S3 client for bucket: {}", config.bucket);

        Ok(Self::from_client(
            aws_sdk_s3::Client::from_conf(s3_config.build()),
            config.bucket.clone(),
        ))
    }

    pub fn from_client(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn client(&self) -> &aws_sdk_s3::Client {
        &self.client
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list_page(&self, request: ListRequest) -> Result<ListPage> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(&request.prefix)
            .set_delimiter(request.delimiter)
            .set_continuation_token(request.continuation_token)
            .set_max_keys(request.max_keys)
            .send()
            .await
            .map_err(|e| Error::storage(StorageOperation::List, &request.prefix, e))?;

        let objects: Vec<ObjectSummary> = response
            .contents()
            .iter()
            .filter_map(|object| {
                object.key().map(|key| ObjectSummary {
                    key: key.to_string(),
                    size: object.size().unwrap_or_default().max(0) as u64,
                })
            })
            .collect();

        let common_prefixes: Vec<String> = response
            .common_prefixes()
            .iter()
            .filter_map(|p| p.prefix().map(str::to_string))
            .collect();

        let key_count = response
            .key_count()
            .map(|count| count.max(0) as usize)
            .unwrap_or(objects.len() + common_prefixes.len());

        let next_continuation_token = if response.is_truncated() == Some(true) {
            response.next_continuation_token().map(str::to_string)
        } else {
            None
        };

        Ok(ListPage {
            objects,
            common_prefixes,
            key_count,
            next_continuation_token,
        })
    }

    async fn copy_object(&self, source_key: &str, dest_key: &str) -> Result<()> {
        self.client
            .copy_object()
            .bucket(&self.bucket)
            .copy_source(copy_source(&self.bucket, source_key))
            .key(dest_key)
            .send()
            .await
            .map_err(|e| Error::storage(StorageOperation::Copy, source_key, e))?;
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<DeleteAck> {
        let response = self
            .client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::storage(StorageOperation::Delete, key, e))?;

        Ok(DeleteAck {
            delete_marker: response.delete_marker(),
            version_id: response.version_id().map(str::to_string),
        })
    }

    async fn put_object(&self, key: &str, body: Bytes) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| Error::storage(StorageOperation::Put, key, e))?;
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Bytes> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::storage(StorageOperation::Get, key, e))?;

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| Error::storage(StorageOperation::Get, key, e))?;

        Ok(body.into_bytes())
    }

    async fn upload_file(&self, path: &Path, key: &str) -> Result<()> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| Error::storage(StorageOperation::Put, key, e))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| Error::storage(StorageOperation::Put, key, e))?;
        Ok(())
    }
}

/// `bucket/key` with the key URL-encoded, as `CopyObject` expects
fn copy_source(bucket: &str, key: &str) -> String {
    format!("{bucket}/{}", utf8_percent_encode(key, COPY_SOURCE))
}
