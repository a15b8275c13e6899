//! Response DTOs
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Acknowledgement of a write-path submission
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    /// Generated id of the persisted record
    pub id: i64,
    pub message: String,
}

impl SubmissionResponse {
    pub fn new(id: i64, what: &str) -> Self {
        Self {
            id,
            message: format!("{what} saved successfully"),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub errors: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Whether the store connection is up
    pub connected: bool,
}

impl StatsResponse {
    pub fn new(stats: &CacheStats, connected: bool) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            sets: stats.sets,
            errors: stats.errors,
            hit_rate: stats.hit_rate(),
            connected,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status, `healthy` or `degraded`
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Reads stay available without the cache, so a lost store only degrades.
    pub fn from_connected(connected: bool) -> Self {
        Self {
            status: if connected { "healthy" } else { "degraded" }.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
