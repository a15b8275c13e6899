//! Cache-Aside Orchestrator
//!
//! Per request: build key, read the cache, fall back to a validated database
//! record, fall back to the producer, write back with the operation's TTL.
//! Cache and database failures degrade to the next stage; producer failures
//! propagate and leave the cache untouched.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tokio::sync::Mutex;

use crate::cache::{build_key, CacheKey, ParamValue, StoreAdapter};
use crate::error::{ComputeError, PersistenceError, Result, ServiceError};
use crate::events::{CacheAction, EventEmitter};
use crate::models::{ResultSource, Sourced};
use crate::service::policy::Operation;

// == Cache Request ==
/// Normalized description of one read.
#[derive(Debug, Clone)]
pub struct CacheRequest {
    operation: Operation,
    params: BTreeMap<String, ParamValue>,
    user_id: Option<String>,
}

impl CacheRequest {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            params: BTreeMap::new(),
            user_id: None,
        }
    }

    #[must_use]
    pub fn param(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    /// Caller identity. Never part of the key.
    #[must_use]
    pub fn user(mut self, user_id: Option<&str>) -> Self {
        self.user_id = user_id.map(str::to_string);
        self
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn key(&self) -> CacheKey {
        build_key(self.operation.name(), self.params.clone())
    }

    /// Keys of PII-bearing requests are flagged in cache events.
    pub fn is_sensitive(&self) -> bool {
        self.operation.touches_pii() || self.user_id.is_some()
    }
}

// == In-Flight Map ==
/// Per-key locks collapsing concurrent misses into one computation.
#[derive(Debug, Default)]
struct InFlight {
    slots: StdMutex<HashMap<CacheKey, Arc<Mutex<()>>>>,
}

impl InFlight {
    /// Joins the slot for `key`; the slot is released when the guard drops.
    fn join(self: &Arc<Self>, key: &CacheKey) -> SlotGuard {
        let mut slots = self.slots.lock().unwrap_or_else(|p| p.into_inner());
        let slot = slots.entry(key.clone()).or_default().clone();
        SlotGuard {
            in_flight: Arc::clone(self),
            key: key.clone(),
            slot,
        }
    }

    /// Drops the slot once no other request holds it.
    fn release(&self, key: &CacheKey, slot: &Arc<Mutex<()>>) {
        let mut slots = self.slots.lock().unwrap_or_else(|p| p.into_inner());
        // One reference in the map, one in the releasing guard
        if Arc::strong_count(slot) <= 2 {
            slots.remove(key);
        }
    }

    fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}

/// Membership in one key's slot. Releases on drop, including when the
/// owning request is cancelled while waiting or computing.
struct SlotGuard {
    in_flight: Arc<InFlight>,
    key: CacheKey,
    slot: Arc<Mutex<()>>,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.in_flight.release(&self.key, &self.slot);
    }
}

// == Cache Aside ==
#[derive(Debug, Clone)]
pub struct CacheAside {
    adapter: StoreAdapter,
    emitter: EventEmitter,
    in_flight: Option<Arc<InFlight>>,
}

impl CacheAside {
    /// Orchestrator with single-flight coalescing enabled.
    pub fn new(adapter: StoreAdapter, emitter: EventEmitter) -> Self {
        Self {
            adapter,
            emitter,
            in_flight: Some(Arc::new(InFlight::default())),
        }
    }

    /// With `coalesce = false` concurrent misses compute independently and
    /// the last write wins.
    #[must_use]
    pub fn with_coalescing(mut self, coalesce: bool) -> Self {
        self.in_flight = coalesce.then(|| Arc::new(InFlight::default()));
        self
    }

    pub fn adapter(&self) -> &StoreAdapter {
        &self.adapter
    }

    /// Number of keys with a computation currently in flight.
    pub fn in_flight(&self) -> usize {
        self.in_flight.as_ref().map_or(0, |f| f.len())
    }

    // == Fetch ==
    /// Resolves `request` through cache, database and producer.
    ///
    /// `lookup` returns a validated record if one exists; `compute` produces a
    /// fresh result. Only a `compute` failure is returned as an error.
    pub async fn fetch<T, L, LF, C, CF>(&self, request: &CacheRequest, lookup: L, compute: C) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Sourced,
        L: FnOnce() -> LF,
        LF: Future<Output = std::result::Result<Option<T>, PersistenceError>>,
        C: FnOnce() -> CF,
        CF: Future<Output = std::result::Result<T, ComputeError>>,
    {
        let key = request.key();
        let sensitive = request.is_sensitive();

        if let Some(hit) = self.read_cache::<T>(&key).await {
            self.emitter.cache(CacheAction::Hit, key.as_str(), sensitive);
            return Ok(hit);
        }
        self.emitter.cache(CacheAction::Miss, key.as_str(), sensitive);

        let Some(in_flight) = &self.in_flight else {
            return self.resolve(request, &key, lookup, compute).await;
        };

        let member = in_flight.join(&key);
        let _held = member.slot.lock().await;
        // A request that held the slot before us may have filled the cache
        let result = match self.read_cache::<T>(&key).await {
            Some(hit) => {
                self.emitter.cache(CacheAction::Hit, key.as_str(), sensitive);
                Ok(hit)
            }
            None => self.resolve(request, &key, lookup, compute).await,
        };
        result
    }

    async fn resolve<T, L, LF, C, CF>(
        &self,
        request: &CacheRequest,
        key: &CacheKey,
        lookup: L,
        compute: C,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Sourced,
        L: FnOnce() -> LF,
        LF: Future<Output = std::result::Result<Option<T>, PersistenceError>>,
        C: FnOnce() -> CF,
        CF: Future<Output = std::result::Result<T, ComputeError>>,
    {
        let operation = request.operation();

        match lookup().await {
            Ok(Some(mut record)) => {
                record.set_source(ResultSource::Database);
                self.emitter.database(
                    "select",
                    operation.table(),
                    json!({ "operation": operation.name(), "found": true }),
                );
                self.emitter.data_access(
                    "read",
                    operation.table(),
                    json!({ "operation": operation.name(), "userId": request.user_id }),
                );
                self.write_back(request, key, &record).await;
                return Ok(record);
            }
            Ok(None) => {}
            Err(e) => {
                self.emitter.error(
                    "Database lookup failed, computing result",
                    &e,
                    json!({ "operation": operation.name(), "key": key.as_str() }),
                );
            }
        }

        let started = Instant::now();
        let result = compute().await.map_err(|e| {
            self.emitter.error(
                "Computation failed",
                &e,
                json!({ "operation": operation.name(), "key": key.as_str() }),
            );
            ServiceError::Computation {
                operation: operation.name().to_string(),
                reason: e.to_string(),
            }
        })?;
        self.emitter
            .performance(operation.name(), started.elapsed(), json!({ "source": result.source() }));

        self.write_back(request, key, &result).await;
        Ok(result)
    }

    /// Cache read with adapter failures folded into a miss.
    async fn read_cache<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        match self.adapter.try_get::<T>(key.as_str()).await {
            Ok(found) => found,
            Err(e) => {
                self.emitter.error(
                    "Cache lookup failed, treating as miss",
                    &e,
                    json!({ "key": key.as_str() }),
                );
                None
            }
        }
    }

    async fn write_back<T: Serialize>(&self, request: &CacheRequest, key: &CacheKey, value: &T) {
        let ttl = request.operation().ttl_seconds();
        match self.adapter.try_set(key.as_str(), value, Some(ttl)).await {
            Ok(()) => self
                .emitter
                .cache(CacheAction::Set, key.as_str(), request.is_sensitive()),
            Err(e) => self.emitter.error(
                "Cache write failed",
                &e,
                json!({ "key": key.as_str(), "ttlSeconds": ttl }),
            ),
        }
    }
}
