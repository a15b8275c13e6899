//! Cache Entry Module
//!
//! A serialized payload with optional expiry, as held by the in-process store.

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// Entries are read-only between writes; a write replaces the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The serialized payload
    pub value: String,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry written at `now_ms`.
    ///
    /// # Arguments
    /// * `value` - The serialized payload
    /// * `ttl_seconds` - Optional TTL in seconds
    /// * `now_ms` - Write time from the store's clock
    pub fn new(value: String, ttl_seconds: Option<u64>, now_ms: u64) -> Self {
        let expires_at = ttl_seconds.map(|ttl| now_ms.saturating_add(ttl.saturating_mul(1000)));

        Self {
            value,
            created_at: now_ms,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// An entry is expired once the current time reaches its expiration time.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in seconds, or None if no expiration is set.
    pub fn ttl_remaining(&self, now_ms: u64) -> Option<u64> {
        self.expires_at
            .map(|expires| expires.saturating_sub(now_ms) / 1000)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::new("{\"entities\":[]}".to_string(), None, 1_000);

        assert_eq!(entry.created_at, 1_000);
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired_at(u64::MAX));
        assert!(entry.ttl_remaining(5_000).is_none());
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let entry = CacheEntry::new("payload".to_string(), Some(1800), 0);

        assert!(!entry.is_expired_at(1_799_999));
        assert!(entry.is_expired_at(1_800_000));
        assert!(entry.is_expired_at(1_800_001));
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new("payload".to_string(), Some(600), 10_000);

        assert_eq!(entry.ttl_remaining(10_000), Some(600));
        assert_eq!(entry.ttl_remaining(310_000), Some(300));
        assert_eq!(entry.ttl_remaining(700_000), Some(0));
    }
}
