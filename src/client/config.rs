//! Request Configuration
//!
//! Client-wide defaults and per-call overrides, shallow-merged per request.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::DEFAULT_TTL_SECS;

/// Default retry budget (total attempts)
pub const DEFAULT_RETRIES: u32 = 3;

/// Default per-attempt timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

// == Method ==
/// HTTP verbs the client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Request Config ==
/// Fully resolved configuration of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    pub method: Method,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
    /// Whether a GET may be served from and written to the cache
    pub cache: bool,
    /// Lifetime of a cached response
    pub cache_ttl: Duration,
    /// Total attempts before the last failure is returned
    pub retries: u32,
    /// Budget of a single attempt
    pub timeout: Duration,
}

impl Default for RequestConfig {
    fn default() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        Self {
            method: Method::Get,
            headers,
            body: None,
            cache: true,
            cache_ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            retries: DEFAULT_RETRIES,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl RequestConfig {
    // == Merge ==
    /// Overlays per-call options on top of these defaults.
    ///
    /// The merge is shallow: a provided header map replaces the default
    /// headers entirely rather than being combined with them.
    pub fn merge(&self, options: RequestOptions) -> RequestConfig {
        RequestConfig {
            method: options.method.unwrap_or(self.method),
            headers: options.headers.unwrap_or_else(|| self.headers.clone()),
            body: options.body.or_else(|| self.body.clone()),
            cache: options.cache.unwrap_or(self.cache),
            cache_ttl: options.cache_ttl.unwrap_or(self.cache_ttl),
            retries: options.retries.unwrap_or(self.retries),
            timeout: options.timeout.unwrap_or(self.timeout),
        }
    }

    /// Whether the response may come from, and go into, the cache.
    pub fn is_cache_eligible(&self) -> bool {
        self.method == Method::Get && self.cache
    }
}

// == Request Options ==
/// Per-call overrides; `None` fields fall back to the client defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Option<Method>,
    pub headers: Option<BTreeMap<String, String>>,
    pub body: Option<Value>,
    pub cache: Option<bool>,
    pub cache_ttl: Option<Duration>,
    pub retries: Option<u32>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Adds one header to this call's header map.
    ///
    /// Once any header is set on the options, the default headers no
    /// longer apply to this call.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
