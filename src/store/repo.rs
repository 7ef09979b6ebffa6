use anyhow::Result;
use async_trait::async_trait;

use crate::domain::email::ObjectKey;

/// One page of a listing under a bucket/prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectListing {
    pub keys: Vec<ObjectKey>,
    pub next_continuation_token: Option<String>,
    pub is_truncated: bool,
}

/// Remote object storage (bucket/key/pagination semantics).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn list_buckets(&self) -> Result<Vec<String>>;

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        max_keys: i32,
        continuation_token: Option<&str>,
    ) -> Result<ObjectListing>;

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
}
