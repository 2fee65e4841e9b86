//! API Module
//!
//! Admin and proxy HTTP surface over the shared cache and request client.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /cache/stats` - Cache statistics
//! - `DELETE /cache` - Clear the cache
//! - `POST /cache/cleanup` - Run one expiry sweep
//! - `POST /cache/invalidate` - Invalidate the cached GET for a URL
//! - `POST /fetch` - Fetch a URL through the request client
//! - `POST /prefetch` - Prefetch a URL in the background

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
