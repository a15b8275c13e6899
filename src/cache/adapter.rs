//! Store Adapter Module
//!
//! Typed get/set/del/exists over a `KeyValueStore`. The `try_*` methods
//! return `Result<_, AdapterError>`; the plain methods fold every failure
//! into a miss or a no-op and log it, so callers behave the same whether
//! the store is reachable or not.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tokio::sync::RwLock;

use crate::cache::stats::{CacheStats, StatsRecorder};
use crate::cache::{KeyValueStore, MemoryStore};
use crate::config::Config;
use crate::error::AdapterError;
use crate::events::EventEmitter;

// == Store Adapter ==
/// Shared handle to the single store connection of the process.
#[derive(Debug, Clone)]
pub struct StoreAdapter {
    store: Arc<RwLock<Option<Arc<dyn KeyValueStore>>>>,
    stats: Arc<StatsRecorder>,
    emitter: EventEmitter,
}

impl StoreAdapter {
    // == Constructors ==
    pub fn new(store: Arc<dyn KeyValueStore>, emitter: EventEmitter) -> Self {
        Self {
            store: Arc::new(RwLock::new(Some(store))),
            stats: Arc::new(StatsRecorder::default()),
            emitter,
        }
    }

    /// Adapter with no backend: every read misses, every write is dropped.
    pub fn degraded(emitter: EventEmitter) -> Self {
        Self {
            store: Arc::new(RwLock::new(None)),
            stats: Arc::new(StatsRecorder::default()),
            emitter,
        }
    }

    /// Adapter over a fresh in-process store.
    pub fn in_memory(emitter: EventEmitter) -> Self {
        Self::new(Arc::new(MemoryStore::new()), emitter)
    }

    // == Connect ==
    /// Best-effort connect to the configured remote store.
    ///
    /// A failed connect is logged and yields a degraded adapter that stays
    /// degraded until restart.
    #[cfg(feature = "redis")]
    pub async fn connect(config: &Config, emitter: EventEmitter) -> Self {
        match crate::cache::RedisStore::connect(&config.cache_url).await {
            Ok(store) => Self::new(Arc::new(store), emitter),
            Err(e) => {
                emitter.error(
                    "Failed to connect to key-value store, caching disabled",
                    &e,
                    json!({ "component": "store_adapter" }),
                );
                Self::degraded(emitter)
            }
        }
    }

    /// Without a remote backend compiled in, the in-process store is used.
    #[cfg(not(feature = "redis"))]
    pub async fn connect(config: &Config, emitter: EventEmitter) -> Self {
        emitter.info(
            "Remote store support not compiled in, using in-process store",
            json!({ "configuredUrl": config.cache_url.as_str() }),
        );
        Self::in_memory(emitter)
    }

    async fn backend(&self) -> Result<Arc<dyn KeyValueStore>, AdapterError> {
        self.store
            .read()
            .await
            .clone()
            .ok_or_else(|| AdapterError::Unavailable("no store connection".to_string()))
    }

    pub async fn is_connected(&self) -> bool {
        self.store.read().await.is_some()
    }

    // == Try Get ==
    /// Reads and deserializes `key`. `Ok(None)` is a miss.
    pub async fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AdapterError> {
        let result = async {
            let raw = self.backend().await?.get(key).await?;
            raw.map(|s| serde_json::from_str::<T>(&s))
                .transpose()
                .map_err(AdapterError::from)
        }
        .await;

        match &result {
            Ok(Some(_)) => self.stats.record_hit(),
            Ok(None) => self.stats.record_miss(),
            Err(_) => self.stats.record_error(),
        }
        result
    }

    // == Get ==
    /// Like `try_get`, with failures logged and reported as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_get(key).await {
            Ok(value) => value,
            Err(e) => {
                self.log_failure("get", key, &e);
                None
            }
        }
    }

    // == Try Set ==
    /// Serializes and writes `value`. A TTL of zero is treated as no TTL.
    pub async fn try_set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: Option<u64>,
    ) -> Result<(), AdapterError> {
        let result = async {
            let payload = serde_json::to_string(value)?;
            let ttl = ttl_seconds.filter(|ttl| *ttl > 0);
            self.backend().await?.set(key, payload, ttl).await
        }
        .await;

        match &result {
            Ok(()) => self.stats.record_set(),
            Err(_) => self.stats.record_error(),
        }
        result
    }

    // == Set ==
    /// Fire-and-forget write.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl_seconds: Option<u64>) {
        if let Err(e) = self.try_set(key, value, ttl_seconds).await {
            self.log_failure("set", key, &e);
        }
    }

    // == Delete ==
    pub async fn try_del(&self, key: &str) -> Result<(), AdapterError> {
        let result = self.backend().await?.del(key).await;
        if result.is_err() {
            self.stats.record_error();
        }
        result
    }

    pub async fn del(&self, key: &str) {
        if let Err(e) = self.try_del(key).await {
            self.log_failure("del", key, &e);
        }
    }

    // == Exists ==
    pub async fn try_exists(&self, key: &str) -> Result<bool, AdapterError> {
        let result = self.backend().await?.exists(key).await;
        if result.is_err() {
            self.stats.record_error();
        }
        result
    }

    /// `false` whenever the store cannot answer.
    pub async fn exists(&self, key: &str) -> bool {
        match self.try_exists(key).await {
            Ok(found) => found,
            Err(e) => {
                self.log_failure("exists", key, &e);
                false
            }
        }
    }

    // == Maintenance ==
    /// Sweeps expired entries; returns 0 when degraded or on failure.
    pub async fn purge_expired(&self) -> usize {
        let Ok(store) = self.backend().await else {
            return 0;
        };
        match store.purge_expired().await {
            Ok(removed) => removed,
            Err(e) => {
                self.log_failure("purge", "*", &e);
                0
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    // == Close ==
    /// Releases the connection. Later calls behave as degraded.
    pub async fn close(&self) {
        let released = self.store.write().await.take();
        if let Some(store) = released {
            match store.close().await {
                Ok(()) => self.emitter.info("Key-value store connection closed", json!({})),
                Err(e) => self.log_failure("close", "*", &e),
            }
        }
    }

    /// Guard that releases the connection when dropped, covering panics and
    /// early returns between startup and an orderly [`CloseGuard::close`].
    pub fn close_guard(&self) -> CloseGuard {
        CloseGuard {
            adapter: Some(self.clone()),
        }
    }

    fn log_failure(&self, op: &str, key: &str, err: &AdapterError) {
        self.emitter.error(
            &format!("Cache {op} failed"),
            err,
            json!({ "operation": op, "key": key }),
        );
    }
}

// == Close Guard ==
#[derive(Debug)]
pub struct CloseGuard {
    adapter: Option<StoreAdapter>,
}

impl CloseGuard {
    /// Orderly close, awaited on the normal exit path.
    pub async fn close(mut self) {
        if let Some(adapter) = self.adapter.take() {
            adapter.close().await;
        }
    }
}

impl Drop for CloseGuard {
    fn drop(&mut self) {
        let Some(adapter) = self.adapter.take() else {
            return;
        };
        // Drop cannot await: detach the handle now, finish closing on the runtime if one is left
        let released = adapter.store.try_write().ok().and_then(|mut slot| slot.take());
        let Some(store) = released else {
            return;
        };
        adapter
            .emitter
            .warn("Key-value store released without orderly close", json!({}));
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let emitter = adapter.emitter.clone();
            handle.spawn(async move {
                if let Err(e) = store.close().await {
                    emitter.error("Cache close failed", &e, json!({ "operation": "close" }));
                }
            });
        }
    }
}
