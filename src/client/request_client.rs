//! Resilient Request Client
//!
//! Issues HTTP calls through a [`Transport`], serving cache-eligible GETs
//! from the shared cache, bounding every attempt with a timeout and
//! retrying failures with exponential backoff.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::SharedCache;
use crate::client::{
    HttpRequest, Method, RequestConfig, RequestOptions, RetryPolicy, Transport,
};
use crate::error::{ClientError, Result};

// == Api Response ==
/// Payload returned to callers, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    /// True iff served from the cache without touching the network
    pub cached: bool,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    fn new(data: T, cached: bool) -> Self {
        Self {
            data,
            cached,
            timestamp: Utc::now(),
        }
    }
}

// == Cache Key ==
/// Builds `METHOD:url:json(body)`; an absent or null body serializes as `""`.
///
/// JSON objects serialize with sorted keys, so semantically equal bodies
/// map to the same key.
pub fn cache_key(method: Method, url: &str, body: Option<&Value>) -> String {
    let body = match body {
        None | Some(Value::Null) => "\"\"".to_string(),
        Some(body) => body.to_string(),
    };
    format!("{}:{}:{}", method, url, body)
}

// == Request Client ==
/// The single network-access path for callers.
pub struct RequestClient {
    base_url: String,
    defaults: RequestConfig,
    cache: SharedCache,
    transport: Arc<dyn Transport>,
}

impl RequestClient {
    // == Constructor ==
    /// Creates a client with the stock defaults (GET, JSON headers, caching
    /// on for 5 minutes, 3 attempts, 10 second timeout).
    pub fn new(base_url: impl Into<String>, cache: SharedCache, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into(),
            defaults: RequestConfig::default(),
            cache,
            transport,
        }
    }

    /// Replaces the client-wide defaults.
    pub fn with_defaults(mut self, defaults: RequestConfig) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &RequestConfig {
        &self.defaults
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // == Verbs ==
    /// GET, served from the cache when a live entry exists.
    pub async fn get<T: DeserializeOwned>(&self, url: &str, options: RequestOptions) -> Result<ApiResponse<T>> {
        self.request(url, options.method(Method::Get)).await
    }

    /// POST. Never reads or writes the cache.
    pub async fn post<T: DeserializeOwned>(
        &self,
        url: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>> {
        let options = RequestOptions { body, ..options };
        self.request(url, options.method(Method::Post).cache(false)).await
    }

    /// PUT. Never reads or writes the cache.
    pub async fn put<T: DeserializeOwned>(
        &self,
        url: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>> {
        let options = RequestOptions { body, ..options };
        self.request(url, options.method(Method::Put).cache(false)).await
    }

    /// DELETE. Never reads or writes the cache.
    pub async fn delete<T: DeserializeOwned>(&self, url: &str, options: RequestOptions) -> Result<ApiResponse<T>> {
        self.request(url, options.method(Method::Delete).cache(false)).await
    }

    // == Prefetch ==
    /// Warms the cache for `url`. Failures are logged and swallowed.
    pub async fn prefetch(&self, url: &str, options: RequestOptions) {
        if let Err(e) = self.get::<Value>(url, options).await {
            warn!("Prefetch of {} failed: {}", url, e);
        }
    }

    // == Invalidation ==
    /// Drops the entry a GET of `url` with these options would have used.
    /// Returns whether an entry was removed.
    pub async fn invalidate_cache(&self, url: &str, options: RequestOptions) -> bool {
        let config = self.defaults.merge(options.method(Method::Get));
        let key = cache_key(config.method, &self.url(url), config.body.as_ref());

        let removed = self.cache.write().await.delete(&key);
        debug!("Invalidated {} (present: {})", key, removed);
        removed
    }

    /// Empties the shared cache.
    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
    }

    // == Core Request ==
    async fn request<T: DeserializeOwned>(&self, url: &str, options: RequestOptions) -> Result<ApiResponse<T>> {
        let config = self.defaults.merge(options);
        let url = self.url(url);
        let key = config
            .is_cache_eligible()
            .then(|| cache_key(config.method, &url, config.body.as_ref()));

        if let Some(key) = &key {
            if let Some(data) = self.read_cached(key).await {
                return Ok(ApiResponse::new(data, true));
            }
        }

        let request = HttpRequest {
            method: config.method,
            url,
            headers: config.headers,
            body: config.body,
        };
        let timeout = config.timeout;
        let policy = RetryPolicy::with_max_attempts(config.retries);

        let payload = policy
            .execute(|attempt| {
                let request = request.clone();
                async move {
                    debug!("{} {} (attempt {})", request.method, request.url, attempt);
                    self.send_once(request, timeout).await
                }
            })
            .await?;

        let data: T = serde_json::from_value(payload.clone())
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        if let Some(key) = key {
            self.cache.write().await.set(key, payload, Some(config.cache_ttl));
        }

        Ok(ApiResponse::new(data, false))
    }

    /// Returns the cached payload for `key` decoded as `T`. An entry that does
    /// not decode is treated as a miss.
    async fn read_cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.cache.write().await.get(key);

        match value.map(serde_json::from_value::<T>) {
            Some(Ok(data)) => {
                debug!("Cache hit for {}", key);
                Some(data)
            }
            Some(Err(e)) => {
                warn!("Cached value for {} does not decode, refetching: {}", key, e);
                None
            }
            None => {
                debug!("Cache miss for {}", key);
                None
            }
        }
    }

    /// One attempt, bounded by `timeout`. Dropping the in-flight future on
    /// expiry cancels the call.
    async fn send_once(&self, request: HttpRequest, timeout: Duration) -> Result<Value> {
        let response = tokio::time::timeout(timeout, self.transport.send(request))
            .await
            .map_err(|_| ClientError::Timeout(timeout))??;

        if !response.is_success() {
            return Err(ClientError::Status {
                status: response.status,
                status_text: response.status_text,
            });
        }

        response.json()
    }
}
