//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

/// Lifetime used when `now + ttl` cannot be represented (about 30 years).
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

// == Cache Entry ==
/// Represents a single cache entry with value and lifetime metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Instant at which the entry was stored
    pub stored_at: Instant,
    /// Instant after which the entry is no longer readable
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry that lives for `ttl` from now.
    ///
    /// A `ttl` too large for the clock is capped at a far-future instant.
    pub fn new(value: V, ttl: Duration) -> Self {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);

        Self {
            value,
            stored_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry stays readable up to and including `expires_at`; it is
    /// expired only once the clock has moved strictly past it.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against an explicit instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_creation() {
        let entry = CacheEntry::new("test_value", Duration::from_secs(60));

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.expires_at - entry.stored_at, Duration::from_secs(60));
        assert!(!entry.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expiration() {
        let entry = CacheEntry::new("test_value", Duration::from_secs(1));

        tokio::time::advance(Duration::from_millis(1001)).await;

        assert!(entry.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("test", Duration::from_secs(1));

        // Exactly at expires_at the entry is still readable
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!entry.is_expired(), "Entry should be valid at boundary");

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(entry.is_expired(), "Entry should expire past boundary");
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_ttl_is_capped_not_panicking() {
        let entry = CacheEntry::new("forever", Duration::MAX);
        assert_eq!(entry.expires_at - entry.stored_at, FAR_FUTURE);
        assert!(!entry.is_expired());

        let entry = CacheEntry::new("forever", Duration::from_secs(u64::MAX));
        tokio::time::advance(Duration::from_secs(86_400 * 365)).await;
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_zero_ttl_entry_valid_at_creation_instant() {
        let entry = CacheEntry::new(1u8, Duration::ZERO);
        assert!(!entry.is_expired_at(entry.stored_at));
        assert!(entry.is_expired_at(entry.stored_at + Duration::from_nanos(1)));
    }
}
