use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KvStore, StorePing};
use crate::errors::StoreError;

/// Process-local key-value map.
///
/// Every command takes the lock once, so `set_nx` checks and inserts under a
/// single write guard and concurrent creates cannot both win.
#[derive(Clone, Default)]
pub struct InMemoryKvStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let map = self.inner.read().await;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.inner.write().await;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn set_nx(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        let mut map = self.inner.write().await;
        if map.contains_key(key) {
            return Ok(false);
        }
        map.insert(key.to_string(), value.to_string());
        Ok(true)
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let map = self.inner.read().await;
        Ok(map.contains_key(key))
    }

    async fn delete(&self, key: &str) -> Result<u64, StoreError> {
        let mut map = self.inner.write().await;
        Ok(u64::from(map.remove(key).is_some()))
    }
}

#[async_trait]
impl StorePing for InMemoryKvStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
