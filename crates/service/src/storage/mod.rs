//! Key-value storage used by the service layer.
//!
//! [`KvStore`] is the whole command set the binding service relies on.
//! Backends: [`memory::InMemoryKvStore`] for tests and local runs, and
//! `redis_store::RedisKvStore` (feature `redis-store`) for deployments.

use async_trait::async_trait;

use crate::errors::StoreError;

pub mod memory;
#[cfg(feature = "redis-store")]
pub mod redis_store;

pub use memory::InMemoryKvStore;
#[cfg(feature = "redis-store")]
pub use redis_store::RedisKvStore;

/// String keys to string values, with one conditional write.
///
/// Implementations must make `set_nx` atomic with respect to concurrent callers:
/// of N racing `set_nx` calls on one absent key, exactly one returns `true`.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Value under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Unconditionally write `value` under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Write only if `key` is absent; `true` if this call wrote it.
    async fn set_nx(&self, key: &str, value: &str) -> Result<bool, StoreError>;

    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Remove `key`; returns the number of keys removed (0 or 1).
    async fn delete(&self, key: &str) -> Result<u64, StoreError>;
}

/// Liveness probe, kept apart from the data commands.
#[async_trait]
pub trait StorePing: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}
