//! Cache Module
//!
//! Key building, key-value backends and the failure-containing adapter that
//! sits in front of every read operation.

mod adapter;
mod clock;
mod entry;
mod key;
#[cfg(feature = "redis")]
mod redis_store;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use adapter::{CloseGuard, StoreAdapter};
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use key::{build_key, truncate_for_key, CacheKey, ParamValue, FREE_TEXT_KEY_CHARS};
#[cfg(feature = "redis")]
pub use redis_store::RedisStore;
pub use stats::{CacheStats, StatsRecorder};
pub use store::{KeyValueStore, MemoryStore};
