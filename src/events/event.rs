//! Log Event Types
//!
//! Structured, already-redacted events as handed to a sink.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Metadata attached to an event.
pub type Metadata = Map<String, Value>;

// == Log Level ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

// == Event Category ==
/// Queryable category of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EventCategory {
    General,
    Error,
    Performance,
    DataAccess,
    Cache,
    Database,
    Security,
    Gdpr,
    UserActivity,
    SensitiveData,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::General => "general",
            EventCategory::Error => "error",
            EventCategory::Performance => "performance",
            EventCategory::DataAccess => "dataAccess",
            EventCategory::Cache => "cache",
            EventCategory::Database => "database",
            EventCategory::Security => "security",
            EventCategory::Gdpr => "gdpr",
            EventCategory::UserActivity => "userActivity",
            EventCategory::SensitiveData => "sensitiveData",
        }
    }
}

// == Cache Action ==
/// Outcome tag of a cache event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CacheAction {
    Hit,
    Miss,
    Set,
}

impl CacheAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheAction::Hit => "HIT",
            CacheAction::Miss => "MISS",
            CacheAction::Set => "SET",
        }
    }
}

// == Log Event ==
#[derive(Debug, Clone, Serialize)]
pub struct LogEvent {
    pub level: LogLevel,
    pub category: EventCategory,
    pub message: String,
    pub metadata: Metadata,
    pub timestamp: DateTime<Utc>,
}

impl LogEvent {
    /// Looks up a metadata value as a string slice.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.metadata.get(name).and_then(Value::as_str)
    }
}
