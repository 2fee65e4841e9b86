//! Fetch Cache - an in-memory response cache and resilient HTTP client
//!
//! Provides a bounded TTL cache shared process-wide, and a request client
//! that serves GETs from it, times out each attempt and retries failures
//! with exponential backoff.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStore, SharedCache};
pub use client::{ApiResponse, HttpTransport, RequestClient, RequestOptions};
pub use config::Config;
pub use error::{ClientError, Result};
pub use tasks::spawn_cleanup_task;
