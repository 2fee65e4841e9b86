//! Client Module
//!
//! Resilient HTTP request client: response caching for GETs, a timeout per
//! attempt, and retry with exponential backoff.

mod config;
mod request_client;
mod retry;
mod transport;

pub use config::{Method, RequestConfig, RequestOptions, DEFAULT_RETRIES, DEFAULT_TIMEOUT_MS};
pub use request_client::{cache_key, ApiResponse, RequestClient};
pub use retry::RetryPolicy;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Transport};
