use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;

use crate::store::repo::{ObjectListing, ObjectStore};

/// In-process store with S3-like listing order (lexicographic by key) and
/// index-based continuation tokens. Failures can be injected per operation.
#[derive(Default)]
pub struct MemoryStore {
    buckets: Vec<String>,
    objects: Mutex<BTreeMap<(String, String), Vec<u8>>>,
    unreadable: HashSet<String>,
    fail_listing: bool,
    fail_delete: bool,
}

impl MemoryStore {
    pub fn new(buckets: &[&str]) -> Self {
        Self {
            buckets: buckets.iter().map(|b| b.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_object(self, bucket: &str, key: &str, raw: impl Into<Vec<u8>>) -> Self {
        self.lock()
            .insert((bucket.to_string(), key.to_string()), raw.into());
        self
    }

    /// `get_object` fails for this key.
    pub fn with_unreadable(mut self, key: &str) -> Self {
        self.unreadable.insert(key.to_string());
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.lock()
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<(String, String), Vec<u8>>> {
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_buckets(&self) -> Result<Vec<String>> {
        if self.fail_listing {
            bail!("access denied");
        }
        Ok(self.buckets.clone())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        max_keys: i32,
        continuation_token: Option<&str>,
    ) -> Result<ObjectListing> {
        if self.fail_listing {
            bail!("access denied");
        }
        let start = match continuation_token {
            Some(t) => t
                .parse::<usize>()
                .map_err(|_| anyhow!("invalid continuation token {t:?}"))?,
            None => 0,
        };
        let matching: Vec<String> = self
            .lock()
            .keys()
            .filter(|(b, k)| b == bucket && k.starts_with(prefix))
            .map(|(_, k)| k.clone())
            .collect();

        let end = (start + max_keys.max(0) as usize).min(matching.len());
        let is_truncated = end < matching.len();
        Ok(ObjectListing {
            keys: matching[start.min(end)..end].to_vec(),
            next_continuation_token: is_truncated.then(|| end.to_string()),
            is_truncated,
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        if self.unreadable.contains(key) {
            bail!("no such key: {key}");
        }
        self.lock()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| anyhow!("no such key: {key}"))
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        if self.fail_delete {
            bail!("delete forbidden");
        }
        self.lock().remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}
