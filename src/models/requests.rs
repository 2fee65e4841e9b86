//! Request DTOs for the admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::time::Duration;

use serde::Deserialize;

use crate::client::RequestOptions;

/// Request body for POST /fetch
///
/// Optional fields fall back to the client defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchRequest {
    /// Path or URL, appended to the client base URL
    pub url: String,
    #[serde(default)]
    pub cache: Option<bool>,
    /// Cache TTL in milliseconds
    #[serde(default)]
    pub cache_ttl_ms: Option<u64>,
    #[serde(default)]
    pub retries: Option<u32>,
    /// Per-attempt timeout in milliseconds
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl FetchRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_url(&self.url)
    }

    /// Per-call options for the request client.
    pub fn options(&self) -> RequestOptions {
        RequestOptions {
            cache: self.cache,
            cache_ttl: self.cache_ttl_ms.map(Duration::from_millis),
            retries: self.retries,
            timeout: self.timeout_ms.map(Duration::from_millis),
            ..RequestOptions::default()
        }
    }
}

/// Request body for POST /cache/invalidate and POST /prefetch
#[derive(Debug, Clone, Deserialize)]
pub struct UrlRequest {
    pub url: String,
}

impl UrlRequest {
    pub fn validate(&self) -> Option<String> {
        validate_url(&self.url)
    }
}

fn validate_url(url: &str) -> Option<String> {
    if url.trim().is_empty() {
        return Some("URL cannot be empty".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_request_deserialize_minimal() {
        let req: FetchRequest = serde_json::from_str(r#"{"url": "/api/x"}"#).unwrap();
        assert_eq!(req.url, "/api/x");
        assert_eq!(req.options(), RequestOptions::default());
    }

    #[test]
    fn test_fetch_request_options() {
        let json = r#"{"url": "/api/x", "cache": false, "cache_ttl_ms": 1500, "retries": 1, "timeout_ms": 200}"#;
        let req: FetchRequest = serde_json::from_str(json).unwrap();
        let options = req.options();

        assert_eq!(options.cache, Some(false));
        assert_eq!(options.cache_ttl, Some(Duration::from_millis(1500)));
        assert_eq!(options.retries, Some(1));
        assert_eq!(options.timeout, Some(Duration::from_millis(200)));
        assert!(options.method.is_none());
    }

    #[test]
    fn test_validate_empty_url() {
        let req = UrlRequest { url: "  ".to_string() };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_valid_url() {
        let req = UrlRequest {
            url: "/api/conversations".to_string(),
        };
        assert!(req.validate().is_none());
    }
}
