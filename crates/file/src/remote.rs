//! Directory-style operations over an object-storage bucket
//!
//! [`RemoteDir`] mirrors the local helpers (`list`, `copy`, `remove`, `rename`,
//! `exists`) with keys in place of paths. Keys use `/` as the separator and
//! carry no leading separator.

use crate::local::list_files;
use crate::size::{account, SizeReport};
use crate::store::{list_all, DeleteAck, ListRequest, ObjectStore};
use crate::telemetry::mem_check;
use crate::{Filter, Result, S3Config, S3Store, DEFAULT_PAGE_SIZE};
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};

pub const KEY_SEPARATOR: char = '/';

/// Directory operations over one bucket
///
/// The store handle is created once and reused by every call.
pub struct RemoteDir<S = S3Store> {
    store: S,
    page_size: i32,
}

impl RemoteDir<S3Store> {
    /// Connect to the bucket named in `config`
    pub async fn connect(config: &S3Config) -> Result<Self> {
        let store = S3Store::connect(config).await?;
        Ok(Self::new(store).with_page_size(config.page_size))
    }
}

impl<S: ObjectStore> RemoteDir<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Page cap used by [`RemoteDir::exists`]
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn bucket(&self) -> &str {
        self.store.bucket()
    }

    /// Every key under `prefix`, optionally keeping only keys containing `substring`
    ///
    /// The substring test is literal and case-sensitive.
    pub async fn list(&self, prefix: &str, substring: Option<&str>) -> Result<Vec<String>> {
        let keys: Vec<String> = list_all(&self.store, prefix)
            .await?
            .into_iter()
            .map(|object| object.key)
            .filter(|key| substring.map_or(true, |s| key.contains(s)))
            .collect();

        tracing::debug!(
            "Listed {} objects under: {}",
            keys.len(),
            self.store.display_name(prefix)
        );

        Ok(keys)
    }

    /// Server-side copy within the bucket
    pub async fn copy(&self, source_key: &str, dest_key: &str) -> Result<()> {
        self.store.copy_object(source_key, dest_key).await?;
        tracing::info!(
            "Copied {} to {}",
            self.store.display_name(source_key),
            self.store.display_name(dest_key)
        );
        Ok(())
    }

    /// Delete one object
    ///
    /// S3 acknowledges deletes of missing keys without error.
    pub async fn remove(&self, key: &str) -> Result<DeleteAck> {
        let ack = self.store.delete_object(key).await?;
        tracing::info!("Removed {}", self.store.display_name(key));
        Ok(ack)
    }

    /// Copy to `new_key`, then delete `old_key`
    ///
    /// Not atomic: if the delete fails the object exists under both keys and
    /// the delete error is returned.
    pub async fn rename(&self, old_key: &str, new_key: &str) -> Result<()> {
        self.copy(old_key, new_key).await?;
        self.remove(old_key).await?;
        Ok(())
    }

    /// Store `body` at `key`
    pub async fn put(&self, key: &str, body: impl Into<Bytes>) -> Result<()> {
        self.store.put_object(key, body.into()).await
    }

    /// Mirror every object under `remote_prefix` into `local_root`
    ///
    /// Each object lands at `local_root/<key>`. Directory markers (keys ending
    /// in `/`) only create their directory. Keys with `..`, root or drive
    /// components are skipped with a warning. Returns the written paths.
    pub async fn download_directory(
        &self,
        remote_prefix: &str,
        local_root: &Path,
    ) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        let mut prefixes = vec![remote_prefix.to_string()];

        while let Some(prefix) = prefixes.pop() {
            let mut continuation_token: Option<String> = None;

            loop {
                let request = ListRequest::new(prefix.as_str())
                    .with_delimiter(KEY_SEPARATOR.to_string())
                    .with_continuation_token(continuation_token.take());
                let page = self.store.list_page(request).await?;

                // Descend into sub-prefixes after this level is done
                prefixes.extend(page.common_prefixes.into_iter().rev());

                for object in page.objects {
                    let Some(local_path) = local_path_for(local_root, &object.key) else {
                        tracing::warn!(
                            "Skipping {}: key resolves outside {}",
                            self.store.display_name(&object.key),
                            local_root.display()
                        );
                        continue;
                    };
                    let parent = if object.key.ends_with(KEY_SEPARATOR) {
                        Some(local_path.as_path())
                    } else {
                        local_path.parent()
                    };
                    if let Some(parent) = parent {
                        tokio::fs::create_dir_all(parent).await?;
                    }

                    if object.key.ends_with(KEY_SEPARATOR) {
                        continue;
                    }

                    self.store.download_file(&object.key, &local_path).await?;
                    tracing::debug!(
                        "Downloaded {} to {}",
                        self.store.display_name(&object.key),
                        local_path.display()
                    );
                    written.push(local_path);
                }

                match page.next_continuation_token {
                    Some(token) => continuation_token = Some(token),
                    None => break,
                }
            }
        }

        tracing::info!(
            "Downloaded {} objects from {} to {}",
            written.len(),
            self.store.display_name(remote_prefix),
            local_root.display()
        );

        Ok(written)
    }

    /// Upload every file below `local_root` under `remote_prefix`
    ///
    /// Entries without an extension are treated as directories and skipped.
    /// The key is `remote_prefix` and the path below `local_root` joined by a
    /// single `/`. Returns the uploaded keys.
    pub async fn upload_directory(
        &self,
        local_root: &Path,
        remote_prefix: &str,
    ) -> Result<Vec<String>> {
        let mut uploads = Vec::new();
        for path in list_files(local_root, Filter::All, true)? {
            let path = path?;
            if path.extension().is_none() || !path.is_file() {
                continue;
            }
            let key = remote_key_for(&path, local_root, remote_prefix);
            uploads.push((path, key));
        }

        let mut keys = Vec::with_capacity(uploads.len());
        for (path, key) in uploads {
            self.store.upload_file(&path, &key).await?;
            tracing::debug!(
                "Uploaded {} to {}",
                path.display(),
                self.store.display_name(&key)
            );
            keys.push(key);
        }

        tracing::info!(
            "Uploaded {} files from {} to {}",
            keys.len(),
            local_root.display(),
            self.store.display_name(remote_prefix)
        );

        Ok(keys)
    }

    /// Total size of the objects whose key starts with `key_prefix`
    ///
    /// Reads a single listing page. `None` means nothing (or only empty
    /// objects) matched. When the page is full the real total may be larger,
    /// and the result is [`SizeReport::AtLeast`].
    pub async fn exists(&self, key_prefix: &str, format_size: bool) -> Result<Option<SizeReport>> {
        let request = ListRequest::new(key_prefix).with_max_keys(self.page_size);
        let page = self.store.list_page(request).await?;

        let total: u64 = page
            .objects
            .iter()
            .filter(|object| object.key.starts_with(key_prefix))
            .map(|object| object.size)
            .sum();

        let truncated = page.key_count == self.page_size.max(0) as usize;
        Ok(account(total, format_size, truncated))
    }

    /// Create an empty object at `key` unless something already exists there
    ///
    /// Returns whether an object was created.
    pub async fn create_if_not_exists(&self, key: &str) -> Result<bool> {
        if self.exists(key, false).await?.is_some() {
            mem_check(&format!("Following folder/file already exists: {key}"));
            return Ok(false);
        }

        self.store.put_object(key, Bytes::new()).await?;
        mem_check(&format!("Following folder/file created: {key}"));
        Ok(true)
    }
}

/// Map a local path below `local_root` to a key below `remote_prefix`
///
/// A path outside `local_root` has the first occurrence of the root text
/// replaced instead.
pub fn remote_key_for(path: &Path, local_root: &Path, remote_prefix: &str) -> String {
    let relative = match path.strip_prefix(local_root) {
        Ok(relative) => relative.to_string_lossy().into_owned(),
        Err(_) => {
            let path = path.to_string_lossy();
            let root = local_root.to_string_lossy();
            let key = path.replacen(root.as_ref(), remote_prefix, 1);
            return to_key_separators(key);
        }
    };

    let relative = to_key_separators(relative);
    let prefix = remote_prefix.trim_end_matches(KEY_SEPARATOR);
    match (prefix.is_empty(), relative.is_empty()) {
        (true, _) => relative,
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}{KEY_SEPARATOR}{relative}"),
    }
}

fn to_key_separators(path: String) -> String {
    if std::path::MAIN_SEPARATOR == KEY_SEPARATOR {
        path
    } else {
        path.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Local destination of `key` below `local_root`, if it stays below it
fn local_path_for(local_root: &Path, key: &str) -> Option<PathBuf> {
    let relative = Path::new(key);
    let contained = relative
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
    if !contained {
        return None;
    }

    let path = local_root.join(relative);
    path.starts_with(local_root).then_some(path)
}
