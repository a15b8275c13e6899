//! Events Module
//!
//! Structured, PII-safe logging surface used by every stage of the cache-aside
//! pipeline.

mod emitter;
mod event;
mod sink;

pub use emitter::{redact_metadata, EventEmitter};
pub use event::{CacheAction, EventCategory, LogEvent, LogLevel, Metadata};
pub use sink::{EventSink, MemorySink, TracingSink};
