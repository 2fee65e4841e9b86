//! Configuration Module
//!
//! Handles loading process configuration from environment variables. Only
//! the binary reads the environment; the library takes these values
//! through constructors.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_CLEANUP_INTERVAL_SECS, DEFAULT_MAX_ENTRIES, DEFAULT_TTL_SECS};
use crate::client::{RequestConfig, DEFAULT_RETRIES, DEFAULT_TIMEOUT_MS};

/// Process configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Default TTL in seconds for cached entries
    pub default_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Admin HTTP server port
    pub server_port: u16,
    /// Prefix prepended to every request URL
    pub base_url: String,
    /// Default number of attempts per request
    pub request_retries: u32,
    /// Default per-attempt timeout in milliseconds
    pub request_timeout_ms: u64,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 100)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 300)
    /// - `SERVER_PORT` - Admin HTTP port (default: 3000)
    /// - `API_BASE_URL` - Request URL prefix (default: empty)
    /// - `REQUEST_RETRIES` - Attempts per request (default: 3)
    /// - `REQUEST_TIMEOUT_MS` - Per-attempt timeout (default: 10000)
    pub fn from_env() -> Self {
        Self {
            max_entries: env_or("MAX_ENTRIES", DEFAULT_MAX_ENTRIES),
            default_ttl: env_or("DEFAULT_TTL", DEFAULT_TTL_SECS),
            cleanup_interval: env_or("CLEANUP_INTERVAL", DEFAULT_CLEANUP_INTERVAL_SECS),
            server_port: env_or("SERVER_PORT", 3000),
            base_url: env::var("API_BASE_URL").unwrap_or_default(),
            request_retries: env_or("REQUEST_RETRIES", DEFAULT_RETRIES),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }

    /// Client-wide request defaults derived from this configuration.
    pub fn request_defaults(&self) -> RequestConfig {
        RequestConfig {
            cache_ttl: self.default_ttl(),
            retries: self.request_retries,
            timeout: Duration::from_millis(self.request_timeout_ms),
            ..RequestConfig::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            default_ttl: DEFAULT_TTL_SECS,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL_SECS,
            server_port: 3000,
            base_url: String::new(),
            request_retries: DEFAULT_RETRIES,
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}
