use async_trait::async_trait;

use crate::error::Result;

/// Source of raw dataset bytes, addressed by object key.
#[async_trait]
pub trait ObjectStorePort: Send + Sync {
    async fn get_object(&self, key: &str) -> Result<Vec<u8>>;
}
