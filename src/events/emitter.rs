//! Structured Event Emitter
//!
//! Typed logging surface. Every metadata map passes through the redaction
//! engine before the event reaches a sink.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::{json, Value};

use super::event::{CacheAction, EventCategory, LogEvent, LogLevel, Metadata};
use super::sink::{EventSink, TracingSink};
use crate::redact::{self, FieldKind};

// == Event Emitter ==
/// Cheap to clone; all clones share one sink.
#[derive(Debug, Clone)]
pub struct EventEmitter {
    sink: Arc<dyn EventSink>,
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::tracing()
    }
}

impl EventEmitter {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    /// Emitter that writes through the `tracing` subscriber.
    pub fn tracing() -> Self {
        Self::new(Arc::new(TracingSink))
    }

    // == General Levels ==
    pub fn info(&self, message: &str, metadata: Value) {
        self.emit(LogLevel::Info, EventCategory::General, message, metadata);
    }

    pub fn warn(&self, message: &str, metadata: Value) {
        self.emit(LogLevel::Warn, EventCategory::General, message, metadata);
    }

    pub fn debug(&self, message: &str, metadata: Value) {
        self.emit(LogLevel::Debug, EventCategory::General, message, metadata);
    }

    // == Error ==
    /// Logs a failure with its context.
    ///
    /// The error is reduced to its display text with inline emails and phone
    /// numbers scrubbed; source chains and payloads are never attached.
    pub fn error(&self, message: &str, err: &(dyn StdError + 'static), context: Value) {
        let mut metadata = into_metadata(context);
        metadata.insert("error".to_string(), Value::String(redact::scrub(&err.to_string())));
        self.emit(LogLevel::Error, EventCategory::Error, message, Value::Object(metadata));
    }

    // == Category Events ==
    pub fn performance(&self, operation: &str, elapsed: Duration, metadata: Value) {
        let mut metadata = into_metadata(metadata);
        metadata.insert("operation".to_string(), json!(operation));
        metadata.insert("durationMs".to_string(), json!(elapsed.as_millis() as u64));
        self.emit(
            LogLevel::Debug,
            EventCategory::Performance,
            &format!("{operation} completed"),
            Value::Object(metadata),
        );
    }

    pub fn data_access(&self, action: &str, resource: &str, metadata: Value) {
        let mut metadata = into_metadata(metadata);
        metadata.insert("action".to_string(), json!(action));
        metadata.insert("resource".to_string(), json!(resource));
        self.emit(
            LogLevel::Info,
            EventCategory::DataAccess,
            &format!("{action} {resource}"),
            Value::Object(metadata),
        );
    }

    /// Records a cache outcome. Keys are logged as-is; `is_sensitive` marks
    /// keys derived from PII-bearing requests for aggregated reporting.
    pub fn cache(&self, action: CacheAction, key: &str, is_sensitive: bool) {
        self.emit(
            LogLevel::Debug,
            EventCategory::Cache,
            &format!("Cache {}", action.as_str()),
            json!({
                "action": action.as_str(),
                "key": key,
                "isSensitive": is_sensitive,
            }),
        );
    }

    pub fn database(&self, operation: &str, table: &str, metadata: Value) {
        let mut metadata = into_metadata(metadata);
        metadata.insert("operation".to_string(), json!(operation));
        metadata.insert("table".to_string(), json!(table));
        self.emit(
            LogLevel::Debug,
            EventCategory::Database,
            &format!("Database {operation} on {table}"),
            Value::Object(metadata),
        );
    }

    pub fn security(&self, message: &str, metadata: Value) {
        self.emit(LogLevel::Warn, EventCategory::Security, message, metadata);
    }

    pub fn gdpr(&self, action: &str, metadata: Value) {
        let mut metadata = into_metadata(metadata);
        metadata.insert("action".to_string(), json!(action));
        self.emit(
            LogLevel::Info,
            EventCategory::Gdpr,
            &format!("GDPR {action}"),
            Value::Object(metadata),
        );
    }

    pub fn user_activity(&self, action: &str, user_id: Option<&str>, metadata: Value) {
        let mut metadata = into_metadata(metadata);
        metadata.insert("action".to_string(), json!(action));
        metadata.insert("userId".to_string(), user_id.map_or(Value::Null, |id| json!(id)));
        self.emit(LogLevel::Info, EventCategory::UserActivity, action, Value::Object(metadata));
    }

    /// Records that free text contained a sensitive disclosure. Only the
    /// snippet and category tag are attached.
    pub fn log_sensitive_data(&self, category: &str, snippet: &str, metadata: Value) {
        let mut metadata = into_metadata(metadata);
        metadata.insert("sensitiveCategory".to_string(), json!(category));
        metadata.insert("snippet".to_string(), json!(snippet));
        self.emit(
            LogLevel::Warn,
            EventCategory::SensitiveData,
            "Sensitive content detected",
            Value::Object(metadata),
        );
    }

    /// Scans free text and emits `log_sensitive_data` on a match.
    ///
    /// Returns whether anything was detected.
    pub fn scan_text(&self, text: &str, context: Value) -> bool {
        match redact::detect_sensitive(text) {
            Some(found) => {
                self.log_sensitive_data(found.category.as_str(), &found.snippet, context);
                true
            }
            None => false,
        }
    }

    fn emit(&self, level: LogLevel, category: EventCategory, message: &str, metadata: Value) {
        let event = LogEvent {
            level,
            category,
            message: message.to_string(),
            metadata: redact_metadata(into_metadata(metadata)),
            timestamp: Utc::now(),
        };
        self.sink.emit(&event);
    }
}

// == Metadata Redaction ==
fn into_metadata(value: Value) -> Metadata {
    match value {
        Value::Object(map) => map,
        Value::Null => Metadata::new(),
        other => {
            let mut map = Metadata::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}

/// Masks every value whose key names a known PII field, at any depth.
pub fn redact_metadata(metadata: Metadata) -> Metadata {
    metadata
        .into_iter()
        .map(|(key, value)| {
            let value = match FieldKind::for_field(&key) {
                Some(kind) => mask_value(value, kind),
                None => redact_nested(value),
            };
            (key, value)
        })
        .collect()
}

fn redact_nested(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(redact_metadata(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(redact_nested).collect()),
        other => other,
    }
}

fn mask_value(value: Value, kind: FieldKind) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::String(s) => Value::String(redact::mask_str(&s, kind)),
        Value::Number(n) => Value::String(redact::mask_str(&n.to_string(), kind)),
        Value::Bool(b) => Value::String(redact::mask_str(&b.to_string(), kind)),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|item| mask_value(item, kind)).collect())
        }
        // Every leaf under a PII key takes that key's kind, whatever its own name
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, item)| (key, mask_value(item, kind)))
                .collect(),
        ),
    }
}
