//! Cache Store Module
//!
//! Bounded key-value store with TTL expiration and oldest-first eviction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::cache::{CacheEntry, CacheStats, InsertionOrder};

/// The process-wide cache shared by the request client, the cleanup task
/// and any direct consumers.
pub type SharedCache = Arc<RwLock<CacheStore<serde_json::Value>>>;

// == Cache Store ==
/// Size-bounded, TTL-expiring associative store.
///
/// Expired entries are dropped lazily when `get`/`has` touches them and
/// eagerly by [`cleanup`](CacheStore::cleanup). Capacity is enforced on
/// write by evicting the oldest-inserted key. None of the operations fail.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Insertion order of the keys in `entries`
    order: InsertionOrder,
    /// Running counters (hits, misses, evictions, expirations)
    counters: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// TTL applied when `set` is called without one
    default_ttl: Duration,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    pub fn new(max_entries: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            counters: CacheStats::new(),
            max_entries,
            default_ttl,
        }
    }

    /// Wraps the store for sharing across tasks.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    // == Set ==
    /// Stores a value under `key`, replacing any previous entry wholesale.
    ///
    /// The capacity check runs before insertion: when the store already
    /// holds `max_entries` or more, exactly one entry (the oldest-inserted)
    /// is evicted first, even if `key` itself is already present. A store
    /// with zero capacity holds nothing, so the write is dropped.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL (uses the store default if None)
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        if self.max_entries == 0 {
            return;
        }

        let key = key.into();

        if self.entries.len() >= self.max_entries {
            if let Some(evicted_key) = self.order.pop_oldest() {
                self.entries.remove(&evicted_key);
                self.counters.record_eviction();
            }
        }

        let entry = CacheEntry::new(value, ttl.unwrap_or(self.default_ttl));
        self.entries.insert(key.clone(), entry);
        self.order.record(&key);
    }

    // == Has ==
    /// Returns whether a readable entry exists, purging it if expired.
    pub fn has(&mut self, key: &str) -> bool {
        self.entries.contains_key(key) && !self.purge_if_expired(key)
    }

    // == Delete ==
    /// Removes an entry by key, returning whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.remove(key);
            true
        } else {
            false
        }
    }

    // == Clear ==
    /// Removes every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    // == Cleanup ==
    /// Removes all expired entries and returns how many were removed.
    pub fn cleanup(&mut self) -> usize {
        let now = Instant::now();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.order.remove(key);
        }

        self.counters.record_expirations(expired_keys.len());
        expired_keys.len()
    }

    /// Returns the current number of entries, expired-but-unpurged included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Drops the entry for `key` if it has expired. Returns true if dropped.
    fn purge_if_expired(&mut self, key: &str) -> bool {
        let expired = self
            .entries
            .get(key)
            .map(|entry| entry.is_expired())
            .unwrap_or(false);

        if expired {
            self.entries.remove(key);
            self.order.remove(key);
            self.counters.record_expirations(1);
        }
        expired
    }
}

impl<V: Clone> CacheStore<V> {
    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expired entries are removed and reported as absent. Reading never
    /// extends an entry's lifetime.
    pub fn get(&mut self, key: &str) -> Option<V> {
        if !self.entries.contains_key(key) || self.purge_if_expired(key) {
            self.counters.record_miss();
            return None;
        }

        self.counters.record_hit();
        self.entries.get(key).map(|entry| entry.value.clone())
    }
}

impl<V: Serialize> CacheStore<V> {
    // == Stats ==
    /// Returns counters plus a snapshot of the held keys and an approximate
    /// memory footprint. Values that fail to serialize count as zero bytes.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.counters.clone();
        stats.size = self.entries.len();
        stats.keys = self.order.iter().cloned().collect();
        stats.approx_memory_bytes = self
            .entries
            .iter()
            .map(|(key, entry)| {
                key.len() + serde_json::to_vec(&entry.value).map(|b| b.len()).unwrap_or(0)
            })
            .sum();
        stats
    }
}
