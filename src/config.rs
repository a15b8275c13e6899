//! Configuration Module
//!
//! Handles loading service configuration from environment variables.

use std::env;

/// Fallback key-value store endpoint when no URL is configured.
pub const DEFAULT_CACHE_URL: &str = "redis://127.0.0.1:6379";

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection URL of the key-value store
    pub cache_url: String,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Minimum seconds between two submissions of the same caller
    pub submission_cooldown: u64,
    /// Collapse concurrent misses on one key into a single computation
    pub coalesce: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_URL` (or `REDIS_URL`) - Key-value store URL (default: `redis://127.0.0.1:6379`)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `SUBMISSION_COOLDOWN_SECS` - Per-caller submission cooldown (default: 2)
    /// - `CACHE_COALESCE` - `true`/`false` single-flight on misses (default: true)
    pub fn from_env() -> Self {
        Self {
            cache_url: env::var("CACHE_URL")
                .or_else(|_| env::var("REDIS_URL"))
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CACHE_URL.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            submission_cooldown: env::var("SUBMISSION_COOLDOWN_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            coalesce: env::var("CACHE_COALESCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_url: DEFAULT_CACHE_URL.to_string(),
            server_port: 3000,
            cleanup_interval: 1,
            submission_cooldown: 2,
            coalesce: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_url, "redis://127.0.0.1:6379");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 1);
        assert_eq!(config.submission_cooldown, 2);
        assert!(config.coalesce);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_URL");
        env::remove_var("REDIS_URL");
        env::remove_var("SERVER_PORT");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("SUBMISSION_COOLDOWN_SECS");
        env::remove_var("CACHE_COALESCE");

        let config = Config::from_env();
        assert_eq!(config.cache_url, DEFAULT_CACHE_URL);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 1);
        assert_eq!(config.submission_cooldown, 2);
        assert!(config.coalesce);
    }
}
