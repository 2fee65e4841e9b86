//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for GET /cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    pub size: usize,
    pub max_entries: usize,
    pub keys: Vec<String>,
    pub approx_memory_bytes: usize,
}

impl StatsResponse {
    /// Creates a new StatsResponse from a cache stats snapshot
    pub fn new(stats: CacheStats, max_entries: usize) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            size: stats.size,
            max_entries,
            keys: stats.keys,
            approx_memory_bytes: stats.approx_memory_bytes,
        }
    }
}

/// Response body for DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    /// Number of entries dropped
    pub cleared: usize,
}

impl ClearResponse {
    pub fn new(cleared: usize) -> Self {
        Self {
            message: "Cache cleared".to_string(),
            cleared,
        }
    }
}

/// Response body for POST /cache/cleanup
#[derive(Debug, Clone, Serialize)]
pub struct CleanupResponse {
    /// Number of expired entries removed
    pub removed: usize,
}

/// Response body for POST /cache/invalidate
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub url: String,
    /// Whether a cached entry existed and was dropped
    pub removed: bool,
}

/// Response body for POST /prefetch
#[derive(Debug, Clone, Serialize)]
pub struct PrefetchResponse {
    pub message: String,
    pub url: String,
}

impl PrefetchResponse {
    pub fn scheduled(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            message: format!("Prefetch of '{}' scheduled", url),
            url,
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
