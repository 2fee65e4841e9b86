//! Shared test upstream: a local axum server the request client talks to
//! over real HTTP.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

/// Request counter shared with the upstream handlers.
#[derive(Clone, Default)]
pub struct Upstream {
    hits: Arc<AtomicUsize>,
}

impl Upstream {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn hit(&self) -> usize {
        self.hits.fetch_add(1, Ordering::SeqCst) + 1
    }
}

async fn list_items(State(up): State<Upstream>) -> Json<Value> {
    let n = up.hit();
    Json(json!({ "items": ["hello", "bonjour"], "served": n }))
}

async fn create_item(State(up): State<Upstream>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    up.hit();
    (StatusCode::CREATED, Json(json!({ "created": body })))
}

async fn replace_item(State(up): State<Upstream>, Json(body): Json<Value>) -> Json<Value> {
    up.hit();
    Json(json!({ "replaced": body }))
}

async fn delete_items(State(up): State<Upstream>) -> Json<Value> {
    up.hit();
    Json(json!({ "deleted": true }))
}

/// 503 on the first call, 200 afterwards.
async fn flaky(State(up): State<Upstream>) -> (StatusCode, Json<Value>) {
    if up.hit() == 1 {
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "error": "warming up" })))
    } else {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    }
}

async fn missing(State(up): State<Upstream>) -> (StatusCode, Json<Value>) {
    up.hit();
    (StatusCode::NOT_FOUND, Json(json!({ "error": "no such conversation" })))
}

async fn slow(State(up): State<Upstream>) -> Json<Value> {
    up.hit();
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({ "late": true }))
}

/// Starts the upstream on an ephemeral port and returns its base URL.
pub async fn spawn_upstream() -> (String, Upstream) {
    let upstream = Upstream::default();
    let app = Router::new()
        .route(
            "/api/items",
            get(list_items)
                .post(create_item)
                .put(replace_item)
                .delete(delete_items),
        )
        .route("/api/flaky", get(flaky))
        .route("/api/missing", get(missing))
        .route("/api/slow", get(slow))
        .with_state(upstream.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), upstream)
}
