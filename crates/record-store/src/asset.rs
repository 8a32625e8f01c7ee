use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Result, StoreError};

/// Object storage for binary assets such as product and business images.
///
/// Assets are addressed by a bucket name and a path inside that bucket.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Removes an asset. Removing a missing asset is not an error.
    async fn remove(&self, bucket: &str, path: &str) -> Result<()>;
}

/// In-memory asset store, used by tests and the development server.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssetStore {
    objects: Arc<RwLock<HashMap<(String, String), Vec<u8>>>>,
    fail_on_remove: Arc<AtomicBool>,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an asset, replacing any previous content at the same path.
    pub async fn put(&self, bucket: &str, path: &str, bytes: Vec<u8>) {
        self.objects
            .write()
            .await
            .insert((bucket.to_string(), path.to_string()), bytes);
    }

    pub async fn contains(&self, bucket: &str, path: &str) -> bool {
        self.objects
            .read()
            .await
            .contains_key(&(bucket.to_string(), path.to_string()))
    }

    /// Makes every subsequent `remove` fail until reset.
    pub fn set_fail_on_remove(&self, fail: bool) {
        self.fail_on_remove.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl AssetStore for InMemoryAssetStore {
    async fn remove(&self, bucket: &str, path: &str) -> Result<()> {
        if self.fail_on_remove.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!(
                "failed to remove asset {bucket}/{path}"
            )));
        }

        self.objects
            .write()
            .await
            .remove(&(bucket.to_string(), path.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn remove_deletes_the_object() {
        let assets = InMemoryAssetStore::new();
        assets.put("products", "leash.png", vec![1, 2, 3]).await;
        assert!(assets.contains("products", "leash.png").await);

        assets.remove("products", "leash.png").await.unwrap();
        assert!(!assets.contains("products", "leash.png").await);
    }

    #[tokio::test]
    async fn remove_missing_object_is_ok() {
        let assets = InMemoryAssetStore::new();
        assert!(assets.remove("business", "nothing.png").await.is_ok());
    }

    #[tokio::test]
    async fn injected_failure_keeps_the_object() {
        let assets = InMemoryAssetStore::new();
        assets.put("products", "leash.png", vec![1]).await;
        assets.set_fail_on_remove(true);

        let result = assets.remove("products", "leash.png").await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert!(assets.contains("products", "leash.png").await);
    }
}
