use anyhow::{Result, anyhow};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;

use crate::store::repo::{ObjectListing, ObjectStore};

pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Credentials come from the SDK's default provider chain.
    pub async fn connect(region: &str) -> Self {
        let cfg = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        Self {
            client: Client::new(&cfg),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_buckets(&self) -> Result<Vec<String>> {
        let out = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| anyhow!("list buckets: {}", DisplayErrorContext(&e)))?;

        Ok(out
            .buckets()
            .iter()
            .filter_map(|b| b.name().map(str::to_string))
            .collect())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        max_keys: i32,
        continuation_token: Option<&str>,
    ) -> Result<ObjectListing> {
        let out = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .max_keys(max_keys)
            .set_continuation_token(continuation_token.map(str::to_string))
            .send()
            .await
            .map_err(|e| anyhow!("list s3://{bucket}/{prefix}: {}", DisplayErrorContext(&e)))?;

        Ok(ObjectListing {
            keys: out
                .contents()
                .iter()
                .filter_map(|o| o.key().map(str::to_string))
                .collect(),
            next_continuation_token: out.next_continuation_token().map(str::to_string),
            is_truncated: out.is_truncated().unwrap_or(false),
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let out = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| anyhow!("get s3://{bucket}/{key}: {}", DisplayErrorContext(&e)))?;

        let data = out
            .body
            .collect()
            .await
            .map_err(|e| anyhow!("read s3://{bucket}/{key}: {e}"))?;
        Ok(data.into_bytes().to_vec())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| anyhow!("delete s3://{bucket}/{key}: {}", DisplayErrorContext(&e)))?;
        Ok(())
    }
}
