// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! End-to-end tests for the HTTP gateway.
//!
//! Requests go through the full router, including the actor relay.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use cpuduel_cli::{router, GatewayState};
use cpuduel_core::Config;

fn app() -> Router {
    app_with(Config::default())
}

fn app_with(config: Config) -> Router {
    router(GatewayState::from_config(&config))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, header::HeaderMap, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, headers, body)
}

#[tokio::test]
async fn test_liveness() {
    let app = app();
    let (status, _, body) = get(&app, "/api/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "cpuduel");
}

#[tokio::test]
async fn test_worker_cpu_envelope() {
    let app = app();
    let (status, headers, body) =
        get(&app, "/api/worker-cpu?items=100&itemSize=16&loops=3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(body["mode"], "worker");
    assert_eq!(body["params"]["items"], 100);
    assert_eq!(body["params"]["itemSize"], 16);
    assert_eq!(body["params"]["loops"], 3);
    for key in [
        "elapsedMs",
        "wallMs",
        "elapsedUs",
        "wallUs",
        "checksum",
        "startedAt",
        "endedAt",
        "wallStartedAt",
        "wallEndedAt",
    ] {
        assert!(body.get(key).is_some(), "missing {}", key);
    }
}

#[tokio::test]
async fn test_malformed_parameter_falls_back_to_default() {
    let app = app();
    let (status, _, body) = get(&app, "/api/worker-cpu?items=abc&itemSize=8&loops=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["params"]["items"], 8000);
    assert_eq!(body["params"]["itemSize"], 8);
}

#[tokio::test]
async fn test_both_backends_agree_on_checksum() {
    let app = app();
    let query = "items=300&itemSize=24&loops=5";
    let (worker_status, _, worker) = get(&app, &format!("/api/worker-cpu?{}", query)).await;
    let (do_status, do_headers, actor) = get(&app, &format!("/api/do-cpu?{}", query)).await;

    assert_eq!(worker_status, StatusCode::OK);
    assert_eq!(do_status, StatusCode::OK);
    assert_eq!(do_headers[header::CACHE_CONTROL], "no-store");
    assert_eq!(worker["mode"], "worker");
    assert_eq!(actor["mode"], "durable-object");
    assert_eq!(worker["checksum"], actor["checksum"]);
    assert_eq!(worker["params"], actor["params"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_actor_calls_queue() {
    let app = app();
    let uri = "/api/do-cpu?items=1500&itemSize=64&loops=4";

    let (a, b) = tokio::join!(get(&app, uri), get(&app, uri));
    assert_eq!(a.0, StatusCode::OK);
    assert_eq!(b.0, StatusCode::OK);
    assert_eq!(a.2["checksum"], b.2["checksum"]);

    let interval = |body: &serde_json::Value| {
        (
            body["startedAt"].as_f64().unwrap(),
            body["endedAt"].as_f64().unwrap(),
        )
    };
    let (first, second) = {
        let (x, y) = (interval(&a.2), interval(&b.2));
        if x.0 <= y.0 {
            (x, y)
        } else {
            (y, x)
        }
    };
    assert!(first.1 <= second.0, "actor runs overlapped");
}

#[tokio::test]
async fn test_runtime_fault_is_json_500() {
    let mut config = Config::default();
    config.runner.payload_budget_bytes = 1024 * 1024;
    let app = app_with(config);

    // 200000 * (2048 + 96) bytes is far over a 1 MiB budget
    let uri_tail = "?items=200000&itemSize=2048&loops=1";

    let (status, headers, body) = get(&app, &format!("/api/worker-cpu{}", uri_tail)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
    assert_eq!(body["mode"], "worker");
    assert!(body["error"].as_str().unwrap().contains("budget"));

    let (status, _, body) = get(&app, &format!("/api/do-cpu{}", uri_tail)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["mode"], "durable-object");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_metrics_exposition() {
    let app = app();
    get(&app, "/api/worker-cpu?items=10&itemSize=4&loops=1").await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("cpuduel_runs_total"));
}

#[tokio::test]
async fn test_bind_failure_keeps_io_error() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let mut config = Config::default();
    config.server.listen = taken.local_addr().unwrap();

    let err = cpuduel_cli::start_gateway(&config).await.unwrap_err();
    let io = err
        .downcast_ref::<std::io::Error>()
        .expect("bind failure should surface the io::Error");
    assert_eq!(io.kind(), std::io::ErrorKind::AddrInUse);
}
