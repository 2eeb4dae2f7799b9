//! In-memory object store
//!
//! Follows S3 listing semantics closely enough to exercise pagination,
//! delimiters and page caps without a network.

use crate::store::{missing_key, DeleteAck, ListPage, ListRequest, ObjectStore, ObjectSummary};
use crate::{Error, Result, StorageOperation, DEFAULT_PAGE_SIZE};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

pub struct MemoryStore {
    bucket: String,
    page_size: usize,
    objects: Mutex<BTreeMap<String, Bytes>>,
    fail_deletes: AtomicBool,
}

impl MemoryStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            page_size: DEFAULT_PAGE_SIZE as usize,
            objects: Mutex::new(BTreeMap::new()),
            fail_deletes: AtomicBool::new(false),
        }
    }

    /// Provider-side page cap applied when a request sets no `max_keys`
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_object(self, key: impl Into<String>, body: impl Into<Bytes>) -> Self {
        self.insert(key, body);
        self
    }

    pub fn insert(&self, key: impl Into<String>, body: impl Into<Bytes>) {
        self.lock().insert(key.into(), body.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.lock().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    /// Make every delete fail, as if the process died before it was sent
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Bytes>> {
        // A poisoned map is still a consistent map
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list_page(&self, request: ListRequest) -> Result<ListPage> {
        let cap = request
            .max_keys
            .map(|max_keys| max_keys.max(0) as usize)
            .unwrap_or(self.page_size);
        let objects = self.lock();

        let mut page = ListPage::default();
        let mut last_entry: Option<String> = None;

        let keys = objects
            .range(request.prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&request.prefix));

        for (key, body) in keys {
            // Everything up to and including the first delimiter past the prefix
            let rollup = request.delimiter.as_deref().and_then(|delimiter| {
                key[request.prefix.len()..]
                    .find(delimiter)
                    .map(|at| key[..request.prefix.len() + at + delimiter.len()].to_string())
            });
            let entry = rollup.as_deref().unwrap_or(key.as_str());

            if let Some(token) = request.continuation_token.as_deref() {
                if entry <= token {
                    continue;
                }
            }
            if last_entry.as_deref() == Some(entry) {
                continue;
            }

            if page.key_count == cap {
                page.next_continuation_token = last_entry;
                break;
            }

            last_entry = Some(entry.to_string());
            match rollup {
                Some(prefix) => page.common_prefixes.push(prefix),
                None => page.objects.push(ObjectSummary {
                    key: key.clone(),
                    size: body.len() as u64,
                }),
            }
            page.key_count += 1;
        }

        Ok(page)
    }

    async fn copy_object(&self, source_key: &str, dest_key: &str) -> Result<()> {
        let mut objects = self.lock();
        let body = objects
            .get(source_key)
            .cloned()
            .ok_or_else(|| missing_key(StorageOperation::Copy, source_key))?;
        objects.insert(dest_key.to_string(), body);
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<DeleteAck> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Error::storage(
                StorageOperation::Delete,
                key,
                "delete interrupted",
            ));
        }

        // Deleting a missing key succeeds, as it does on S3
        self.lock().remove(key);
        Ok(DeleteAck::default())
    }

    async fn put_object(&self, key: &str, body: Bytes) -> Result<()> {
        self.lock().insert(key.to_string(), body);
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Bytes> {
        self.get(key)
            .ok_or_else(|| missing_key(StorageOperation::Get, key))
    }
}
