//! Integration Tests for the Admin API
//!
//! Tests full request/response cycles through the router, with the request
//! client talking to a local upstream.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use fetch_cache::{api::create_router, AppState, Config, HttpTransport};
use serde_json::Value;
use tower::ServiceExt;

use common::spawn_upstream;

// == Helper Functions ==

fn create_test_app(base_url: &str) -> Router {
    let config = Config {
        base_url: base_url.to_string(),
        ..Config::default()
    };
    let state = AppState::from_config(&config, Arc::new(HttpTransport::new().unwrap()));
    create_router(state)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// == FETCH Endpoint Tests ==

#[tokio::test]
async fn test_fetch_endpoint_caches() {
    let (base_url, upstream) = spawn_upstream().await;
    let app = create_test_app(&base_url);

    let first = app
        .clone()
        .oneshot(post_json("/fetch", r#"{"url":"/api/items"}"#))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let json = body_to_json(first.into_body()).await;
    assert_eq!(json["cached"], false);
    assert_eq!(json["data"]["items"][0], "hello");
    assert!(json["timestamp"].is_string());

    let second = app
        .oneshot(post_json("/fetch", r#"{"url":"/api/items"}"#))
        .await
        .unwrap();
    let json = body_to_json(second.into_body()).await;
    assert_eq!(json["cached"], true);
    assert_eq!(upstream.hits(), 1);
}

#[tokio::test]
async fn test_fetch_endpoint_without_cache() {
    let (base_url, upstream) = spawn_upstream().await;
    let app = create_test_app(&base_url);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post_json("/fetch", r#"{"url":"/api/items","cache":false}"#))
            .await
            .unwrap();
        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["cached"], false);
    }
    assert_eq!(upstream.hits(), 2);
}

#[tokio::test]
async fn test_fetch_endpoint_upstream_error() {
    let (base_url, _upstream) = spawn_upstream().await;
    let app = create_test_app(&base_url);

    let response = app
        .oneshot(post_json("/fetch", r#"{"url":"/api/missing"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("404"));
}

#[tokio::test]
async fn test_fetch_endpoint_timeout() {
    let (base_url, _upstream) = spawn_upstream().await;
    let app = create_test_app(&base_url);

    let response = app
        .oneshot(post_json(
            "/fetch",
            r#"{"url":"/api/slow","retries":1,"timeout_ms":100}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
}

#[tokio::test]
async fn test_invalid_json_request() {
    let (base_url, _upstream) = spawn_upstream().await;
    let app = create_test_app(&base_url);

    let response = app
        .oneshot(post_json("/fetch", r#"{"not_url": 1}"#))
        .await
        .unwrap();

    // Axum returns 422 for JSON deserialization errors by default
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// == Cache Management Endpoint Tests ==

#[tokio::test]
async fn test_stats_invalidate_and_clear() {
    let (base_url, upstream) = spawn_upstream().await;
    let app = create_test_app(&base_url);

    app.clone()
        .oneshot(post_json("/fetch", r#"{"url":"/api/items"}"#))
        .await
        .unwrap();

    let stats = app.clone().oneshot(get("/cache/stats")).await.unwrap();
    let json = body_to_json(stats.into_body()).await;
    assert_eq!(json["size"], 1);
    assert_eq!(json["max_entries"], 100);
    assert_eq!(json["keys"][0], format!("GET:{}/api/items:\"\"", base_url));
    assert!(json["approx_memory_bytes"].as_u64().unwrap() > 0);

    let invalidated = app
        .clone()
        .oneshot(post_json("/cache/invalidate", r#"{"url":"/api/items"}"#))
        .await
        .unwrap();
    let json = body_to_json(invalidated.into_body()).await;
    assert_eq!(json["removed"], true);

    app.clone()
        .oneshot(post_json("/fetch", r#"{"url":"/api/items"}"#))
        .await
        .unwrap();
    assert_eq!(upstream.hits(), 2);

    let cleared = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/cache")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_to_json(cleared.into_body()).await;
    assert_eq!(json["cleared"], 1);

    let stats = app.oneshot(get("/cache/stats")).await.unwrap();
    let json = body_to_json(stats.into_body()).await;
    assert_eq!(json["size"], 0);
}

#[tokio::test]
async fn test_cleanup_endpoint_removes_expired() {
    let (base_url, _upstream) = spawn_upstream().await;
    let app = create_test_app(&base_url);

    app.clone()
        .oneshot(post_json("/fetch", r#"{"url":"/api/items","cache_ttl_ms":50}"#))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let response = app
        .oneshot(post_json("/cache/cleanup", "{}"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 1);
}

// == PREFETCH Endpoint Tests ==

#[tokio::test]
async fn test_prefetch_endpoint_accepts_failing_url() {
    let (base_url, _upstream) = spawn_upstream().await;
    let app = create_test_app(&base_url);

    let response = app
        .oneshot(post_json("/prefetch", r#"{"url":"/api/missing"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_prefetch_endpoint_warms_cache() {
    let (base_url, upstream) = spawn_upstream().await;
    let app = create_test_app(&base_url);

    let response = app
        .clone()
        .oneshot(post_json("/prefetch", r#"{"url":"/api/items"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    // Wait for the background prefetch to land
    for _ in 0..100 {
        if upstream.hits() == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    let fetched = app
        .oneshot(post_json("/fetch", r#"{"url":"/api/items"}"#))
        .await
        .unwrap();
    let json = body_to_json(fetched.into_body()).await;
    assert_eq!(json["cached"], true);
    assert_eq!(upstream.hits(), 1);
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let (base_url, _upstream) = spawn_upstream().await;
    let app = create_test_app(&base_url);

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}
