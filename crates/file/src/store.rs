//! Object storage seam
//!
//! [`ObjectStore`] is the narrow set of provider calls the remote directory
//! adapter is written against. [`crate::S3Store`] talks to S3 and
//! [`crate::MemoryStore`] keeps objects in a map.

use crate::{Error, Result, StorageOperation};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

/// Largest number of keys a single S3 listing response carries
pub const DEFAULT_PAGE_SIZE: i32 = 1000;

/// One request to the provider's listing call
#[derive(Debug, Clone, Default)]
pub struct ListRequest {
    pub prefix: String,
    /// Group keys sharing a prefix up to this delimiter into common prefixes
    pub delimiter: Option<String>,
    pub continuation_token: Option<String>,
    /// Page size; `None` leaves the provider default in place
    pub max_keys: Option<i32>,
}

impl ListRequest {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    pub fn with_continuation_token(mut self, token: Option<String>) -> Self {
        self.continuation_token = token;
        self
    }

    pub fn with_max_keys(mut self, max_keys: i32) -> Self {
        self.max_keys = Some(max_keys);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
}

/// One page of a listing
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub objects: Vec<ObjectSummary>,
    pub common_prefixes: Vec<String>,
    /// Keys plus common prefixes returned in this page
    pub key_count: usize,
    /// Set when more pages follow
    pub next_continuation_token: Option<String>,
}

/// What the provider reports back for a delete
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteAck {
    pub delete_marker: Option<bool>,
    pub version_id: Option<String>,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Bucket every call is addressed to
    fn bucket(&self) -> &str;

    async fn list_page(&self, request: ListRequest) -> Result<ListPage>;

    /// Server-side copy within the bucket
    async fn copy_object(&self, source_key: &str, dest_key: &str) -> Result<()>;

    async fn delete_object(&self, key: &str) -> Result<DeleteAck>;

    async fn put_object(&self, key: &str, body: Bytes) -> Result<()>;

    async fn get_object(&self, key: &str) -> Result<Bytes>;

    /// Upload a local file as the body of `key`
    async fn upload_file(&self, path: &Path, key: &str) -> Result<()> {
        let body = tokio::fs::read(path).await?;
        self.put_object(key, Bytes::from(body)).await
    }

    /// Write the body of `key` to a local file
    async fn download_file(&self, key: &str, path: &Path) -> Result<()> {
        let body = self.get_object(key).await?;
        tokio::fs::write(path, &body).await?;
        Ok(())
    }

    /// Address of `key` for logging
    fn display_name(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket(), key)
    }
}

/// Fetch every page of a flat (delimiter-less) listing
pub async fn list_all<S: ObjectStore + ?Sized>(
    store: &S,
    prefix: &str,
) -> Result<Vec<ObjectSummary>> {
    let mut objects = Vec::new();
    let mut continuation_token: Option<String> = None;

    loop {
        let request = ListRequest::new(prefix).with_continuation_token(continuation_token.take());
        let page = store.list_page(request).await?;
        objects.extend(page.objects);

        match page.next_continuation_token {
            Some(token) => continuation_token = Some(token),
            None => break,
        }
    }

    Ok(objects)
}

pub(crate) fn missing_key(operation: StorageOperation, key: &str) -> Error {
    Error::storage(operation, key, format!("no such key: {key}"))
}
