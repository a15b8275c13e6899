//! Cache Store Module
//!
//! Raw key-value backends behind the adapter. Backends report every failure;
//! the adapter decides what to contain.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::CacheEntry;
use crate::error::AdapterError;

// == Key-Value Store ==
/// Transport to a key-value store holding serialized text payloads.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Returns the payload stored under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, AdapterError>;

    /// Stores `value`, replacing any previous entry. `None` means no expiry.
    async fn set(&self, key: &str, value: String, ttl_seconds: Option<u64>)
        -> Result<(), AdapterError>;

    async fn del(&self, key: &str) -> Result<(), AdapterError>;

    async fn exists(&self, key: &str) -> Result<bool, AdapterError>;

    /// Drops expired entries eagerly. Backends with native expiry do nothing.
    async fn purge_expired(&self) -> Result<usize, AdapterError> {
        Ok(0)
    }

    /// Releases the underlying connection.
    async fn close(&self) -> Result<(), AdapterError> {
        Ok(())
    }
}

// == Memory Store ==
/// In-process store with passive TTL expiry.
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a store whose expiry is judged by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    // == Length ==
    /// Number of held entries, including expired ones not yet purged.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Remaining TTL of `key` in seconds.
    pub async fn ttl(&self, key: &str) -> Option<u64> {
        let now = self.clock.now_ms();
        self.entries
            .read()
            .await
            .get(key)
            .and_then(|entry| entry.ttl_remaining(now))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    // == Get ==
    /// Expired entries are removed on read and reported as absent.
    async fn get(&self, key: &str) -> Result<Option<String>, AdapterError> {
        let now = self.clock.now_ms();
        let mut entries = self.entries.write().await;

        match entries.get(key) {
            Some(entry) if entry.is_expired_at(now) => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    // == Set ==
    async fn set(
        &self,
        key: &str,
        value: String,
        ttl_seconds: Option<u64>,
    ) -> Result<(), AdapterError> {
        let entry = CacheEntry::new(value, ttl_seconds, self.clock.now_ms());
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    // == Delete ==
    async fn del(&self, key: &str) -> Result<(), AdapterError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    // == Exists ==
    async fn exists(&self, key: &str) -> Result<bool, AdapterError> {
        let now = self.clock.now_ms();
        Ok(self
            .entries
            .read()
            .await
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(now)))
    }

    // == Cleanup Expired ==
    /// Removes all expired entries and returns how many were dropped.
    async fn purge_expired(&self) -> Result<usize, AdapterError> {
        let now = self.clock.now_ms();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        Ok(before - entries.len())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use std::time::Duration;

    fn store_with_clock() -> (MemoryStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        (MemoryStore::with_clock(clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_store_set_and_get() {
        let store = MemoryStore::new();

        store.set("key1", "value1".to_string(), None).await.unwrap();
        let value = store.get("key1").await.unwrap();

        assert_eq!(value.as_deref(), Some("value1"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_get_nonexistent() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nonexistent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_delete() {
        let store = MemoryStore::new();

        store.set("key1", "value1".to_string(), None).await.unwrap();
        store.del("key1").await.unwrap();

        assert!(store.is_empty().await);
        assert!(!store.exists("key1").await.unwrap());
        // Deleting an absent key is not an error
        store.del("key1").await.unwrap();
    }

    #[tokio::test]
    async fn test_store_overwrite_replaces_ttl() {
        let (store, clock) = store_with_clock();

        store.set("key1", "v1".to_string(), Some(10)).await.unwrap();
        store.set("key1", "v2".to_string(), None).await.unwrap();
        clock.advance(Duration::from_secs(60));

        assert_eq!(store.get("key1").await.unwrap().as_deref(), Some("v2"));
        assert_eq!(store.ttl("key1").await, None);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_ttl_expiration() {
        let (store, clock) = store_with_clock();

        store.set("key1", "value1".to_string(), Some(3600)).await.unwrap();
        assert!(store.exists("key1").await.unwrap());
        assert_eq!(store.ttl("key1").await, Some(3600));

        clock.advance(Duration::from_secs(3599));
        assert!(store.get("key1").await.unwrap().is_some());

        clock.advance(Duration::from_secs(1));
        assert!(!store.exists("key1").await.unwrap());
        assert_eq!(store.get("key1").await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_purge_expired() {
        let (store, clock) = store_with_clock();

        store.set("short", "a".to_string(), Some(600)).await.unwrap();
        store.set("long", "b".to_string(), Some(3600)).await.unwrap();
        store.set("forever", "c".to_string(), None).await.unwrap();

        clock.advance(Duration::from_secs(601));

        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert_eq!(store.len().await, 2);
        assert!(store.exists("long").await.unwrap());
        assert!(store.exists("forever").await.unwrap());
    }
}
