//! Event Sinks
//!
//! Transports that receive redacted events: `tracing` for the running
//! service, an in-memory buffer for inspection in tests.

use std::sync::Mutex;

use tracing::{debug, error, info, warn};

use super::event::{EventCategory, LogEvent, LogLevel};

/// Receives events after redaction.
pub trait EventSink: Send + Sync + std::fmt::Debug {
    fn emit(&self, event: &LogEvent);
}

// == Tracing Sink ==
/// Forwards events to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &LogEvent) {
        let category = event.category.as_str();
        let metadata = serde_json::Value::Object(event.metadata.clone());

        match event.level {
            LogLevel::Debug => debug!(category, %metadata, "{}", event.message),
            LogLevel::Info => info!(category, %metadata, "{}", event.message),
            LogLevel::Warn => warn!(category, %metadata, "{}", event.message),
            LogLevel::Error => error!(category, %metadata, "{}", event.message),
        }
    }
}

// == Memory Sink ==
/// Buffers events in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<LogEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event received so far.
    pub fn events(&self) -> Vec<LogEvent> {
        self.lock().clone()
    }

    /// Events of one category, in arrival order.
    pub fn by_category(&self, category: EventCategory) -> Vec<LogEvent> {
        self.lock()
            .iter()
            .filter(|e| e.category == category)
            .cloned()
            .collect()
    }

    /// Number of events at `level`.
    pub fn count_level(&self, level: LogLevel) -> usize {
        self.lock().iter().filter(|e| e.level == level).count()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &LogEvent) {
        self.lock().push(event.clone());
    }
}
