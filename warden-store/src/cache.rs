//! Cache contract
//!
//! TTL'd key-value storage the catalog coordinator memoizes through.
//! Values are JSON so any shared cache (Redis, memcached, a database
//! table) can implement the trait without knowing the catalog types.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreResult;

/// Key-value cache with per-entry time-to-live.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get a value by key. Expired entries read as absent.
    async fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Store a value under a key with the given time-to-live.
    async fn put(&self, key: &str, value: Value, ttl: Duration) -> StoreResult<()>;

    /// Remove a key. Returns whether an entry was present.
    async fn forget(&self, key: &str) -> StoreResult<bool>;

    /// Check whether a live (unexpired) entry exists for a key.
    async fn has(&self, key: &str) -> StoreResult<bool>;
}
