//! API Routes
//!
//! Configures the Axum router with all admin endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cleanup_handler, clear_handler, fetch_handler, health_handler, invalidate_handler,
    prefetch_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /cache/stats` - Cache statistics and held keys
/// - `DELETE /cache` - Clear the cache
/// - `POST /cache/cleanup` - Run one expiry sweep now
/// - `POST /cache/invalidate` - Drop the cached GET for a URL
/// - `POST /fetch` - GET a URL through the request client
/// - `POST /prefetch` - Warm the cache for a URL in the background
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/cache", delete(clear_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/cache/cleanup", post(cleanup_handler))
        .route("/cache/invalidate", post(invalidate_handler))
        .route("/fetch", post(fetch_handler))
        .route("/prefetch", post(prefetch_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
