//! API Handlers
//!
//! HTTP request handlers for the admin endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;
use tracing::info;

use crate::cache::{CacheStore, SharedCache};
use crate::client::{ApiResponse, RequestClient, RequestOptions, Transport};
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::models::{
    CleanupResponse, ClearResponse, FetchRequest, HealthResponse, InvalidateResponse,
    PrefetchResponse, StatsResponse, UrlRequest,
};

/// Application state shared across all handlers.
///
/// The cache handle is the same instance the client reads and writes.
#[derive(Clone)]
pub struct AppState {
    pub cache: SharedCache,
    pub client: Arc<RequestClient>,
}

impl AppState {
    /// Creates a new AppState around an existing client.
    pub fn new(client: RequestClient) -> Self {
        Self {
            cache: client.cache().clone(),
            client: Arc::new(client),
        }
    }

    /// Builds the shared cache and the client from configuration.
    pub fn from_config(config: &Config, transport: Arc<dyn Transport>) -> Self {
        let cache = CacheStore::new(config.max_entries, config.default_ttl()).shared();
        let client = RequestClient::new(config.base_url.clone(), cache, transport)
            .with_defaults(config.request_defaults());
        Self::new(client)
    }
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(StatsResponse::new(cache.stats(), cache.max_entries()))
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let mut cache = state.cache.write().await;
    let cleared = cache.len();
    cache.clear();

    info!("Cache cleared ({} entries)", cleared);
    Json(ClearResponse::new(cleared))
}

/// Handler for POST /cache/cleanup
///
/// Runs one expiry sweep immediately.
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<CleanupResponse> {
    let removed = state.cache.write().await.cleanup();
    Json(CleanupResponse { removed })
}

/// Handler for POST /cache/invalidate
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<UrlRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ClientError::InvalidRequest(error_msg));
    }

    let removed = state
        .client
        .invalidate_cache(&req.url, RequestOptions::new())
        .await;

    Ok(Json(InvalidateResponse {
        url: req.url,
        removed,
    }))
}

/// Handler for POST /fetch
///
/// Performs a GET through the request client and returns its response,
/// cache flag included.
pub async fn fetch_handler(
    State(state): State<AppState>,
    Json(req): Json<FetchRequest>,
) -> Result<Json<ApiResponse<Value>>> {
    if let Some(error_msg) = req.validate() {
        return Err(ClientError::InvalidRequest(error_msg));
    }

    let response = state.client.get(&req.url, req.options()).await?;
    Ok(Json(response))
}

/// Handler for POST /prefetch
///
/// Schedules a background prefetch and returns immediately.
pub async fn prefetch_handler(
    State(state): State<AppState>,
    Json(req): Json<UrlRequest>,
) -> Result<(StatusCode, Json<PrefetchResponse>)> {
    if let Some(error_msg) = req.validate() {
        return Err(ClientError::InvalidRequest(error_msg));
    }

    let client = state.client.clone();
    let url = req.url.clone();
    tokio::spawn(async move {
        client.prefetch(&url, RequestOptions::new()).await;
    });

    Ok((StatusCode::ACCEPTED, Json(PrefetchResponse::scheduled(req.url))))
}
