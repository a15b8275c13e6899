//! Langdata Cache - cache-aside data access for a crowdsourced language-data platform
//!
//! Read operations (sentence listings, NER, POS, sentiment, emotion and
//! translation results) are served from a key-value cache, then from
//! validated database records, then from a compute producer. Every
//! identifier that reaches the logs passes through the redaction engine.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod redact;
pub mod service;
pub mod tasks;

pub use api::{create_router, AppState};
pub use cache::StoreAdapter;
pub use config::Config;
pub use error::{Result, ServiceError};
pub use events::EventEmitter;
pub use service::{CacheAside, CacheRequest, LanguageService};
pub use tasks::spawn_cleanup_task;
