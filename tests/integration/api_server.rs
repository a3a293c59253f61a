//! Integration tests for the API Server
//!
//! Tests HTTP endpoints, health checks, metrics and the signal history API.


use serde_json::{json, Value};

use test_utils::TestApiServer;
use wavesignal::db::SignalStore;
use wavesignal::models::signal::{Signal, SignalLevel, SignalType};

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "wavesignal");
    assert_eq!(body["store_available"], true);
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new().await;
    let _ = app.server.get("/health").await;

    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    for name in [
        "http_requests_total",
        "http_request_duration_seconds",
        "http_requests_in_flight",
        "polls_total",
        "signals_suppressed_total",
    ] {
        assert!(body.contains(name), "Expected {name} metric");
    }
    assert!(body.contains(r#"route="/health""#));
    let health_requests = app
        .metrics
        .http_requests_total
        .with_label_values(&["GET", "/health", "200"])
        .get();
    assert_eq!(health_requests, 1);
}

#[tokio::test]
async fn signal_history_starts_empty() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/signals").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn posted_signal_appears_in_history() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/signals")
        .json(&json!({ "type": "BUY", "level": "High", "price": 0.1612, "time": 1_700_000_000_000i64 }))
        .await;
    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["outcome"], "stored");

    let history: Value = app.server.get("/api/signals").await.json();
    assert_eq!(history.as_array().map(Vec::len), Some(1));
    assert_eq!(history[0]["type"], "BUY");
    assert_eq!(history[0]["level"], "High");
    assert_eq!(history[0]["price"], 0.1612);
    assert_eq!(history[0]["time"], 1_700_000_000_000i64);
    assert!(history[0]["display_time"].is_string());
}

#[tokio::test]
async fn repeated_signal_is_reported_as_duplicate() {
    let app = TestApiServer::new().await;
    let payload = json!({ "type": "SELL", "level": "Medium", "price": 1.5, "time": 60_000 });

    let first = app.server.post("/api/signals").json(&payload).await;
    assert_eq!(first.status_code(), 201);

    let second = app.server.post("/api/signals").json(&payload).await;
    assert_eq!(second.status_code(), 200);
    let body: Value = second.json();
    assert_eq!(body["outcome"], "duplicate");

    let store = app.store.as_ref().expect("store");
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn invalid_signals_are_rejected() {
    let app = TestApiServer::new().await;
    let cases = [
        json!({ "type": "HOLD", "level": "High", "price": 1.0, "time": 1 }),
        json!({ "type": "BUY", "level": "Huge", "price": 1.0, "time": 1 }),
        json!({ "type": "BUY", "level": "High", "price": -1.0, "time": 1 }),
        json!({ "type": "BUY", "level": "High", "price": 0.0, "time": 1 }),
        json!({ "type": "BUY", "level": "High", "price": 1.0, "time": 0 }),
        json!({ "type": "BUY", "level": "High", "time": 1 }),
    ];

    for payload in cases {
        let response = app.server.post("/api/signals").json(&payload).await;
        assert_eq!(response.status_code(), 400, "payload {payload} should be rejected");
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    let store = app.store.as_ref().expect("store");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn history_limit_is_honoured() {
    let app = TestApiServer::new().await;
    let store = app.store.as_ref().expect("store");
    for t in 1..=4 {
        let signal_type = if t % 2 == 0 { SignalType::Sell } else { SignalType::Buy };
        store
            .store_signal(&Signal::new(signal_type, SignalLevel::Medium, 1.0, t * 60_000))
            .await
            .unwrap();
    }

    let body: Value = app
        .server
        .get("/api/signals")
        .add_query_param("limit", 2)
        .await
        .json();
    let times: Vec<i64> = body
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|s| s["time"].as_i64())
        .collect();
    assert_eq!(times, vec![240_000, 180_000]);
}

#[tokio::test]
async fn signal_endpoints_unavailable_without_store() {
    let app = TestApiServer::without_store().await;

    let response = app.server.get("/api/signals").await;
    assert_eq!(response.status_code(), 503);

    let response = app
        .server
        .post("/api/signals")
        .json(&json!({ "type": "BUY", "level": "High", "price": 1.0, "time": 1 }))
        .await;
    assert_eq!(response.status_code(), 503);

    let health: Value = app.server.get("/health").await.json();
    assert_eq!(health["status"], "degraded");
    assert_eq!(health["store_available"], false);
}

#[tokio::test]
async fn chart_unavailable_without_poll_loop() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/chart").await;
    assert_eq!(response.status_code(), 503);
}
