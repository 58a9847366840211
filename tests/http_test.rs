// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP-level tests driving the router in-process.

mod harness;

use axum::{
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{Request, StatusCode},
    Router,
};
use harness::{generators, sources};
use pingback_receiver::{
    config::Config,
    examiner::SourceExaminer,
    handlers::{router, AppState},
    metrics::PingbackMetrics,
    service::PingbackService,
    store::MemoryStore,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::ServiceExt;

const TARGET: &str = "https://blog.example.org/posts/hello";

fn app(config: Config) -> (Router, Arc<AppState>) {
    let store = Arc::new(MemoryStore::with_targets([TARGET]));
    let (tx, _rx) = mpsc::unbounded_channel();
    let examiner = SourceExaminer::new(&config.fetch).unwrap();
    let state = Arc::new(AppState {
        service: PingbackService::new(examiner, store, tx),
        metrics: PingbackMetrics::new().unwrap(),
        config,
    });
    let app = router(state.clone()).layer(MockConnectInfo(SocketAddr::from((
        [192, 0, 2, 77],
        50000,
    ))));
    (app, state)
}

fn post(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/xmlrpc")
        .header("content-type", "text/xml")
        .header("content-length", body.len())
        .body(Body::from(body))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app(Config::default());
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("\"status\":\"healthy\""));
    assert!(body.contains("pingback-receiver"));
}

#[tokio::test]
async fn test_success_response() {
    let server = sources::serve_page("/reply", generators::source_page("Reply", &[TARGET])).await;
    let source = format!("{}/reply", server.uri());
    let (app, state) = app(Config::default());

    let response = app
        .oneshot(post(generators::ping_call(&[&source, TARGET])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/xml");
    let body = body_text(response).await;
    assert!(body.contains("<methodResponse><params>"));
    assert!(body.contains("registered"));
    assert_eq!(state.metrics.count("success"), 1);
}

#[tokio::test]
async fn test_missing_backlink_fault() {
    let server = sources::serve_page("/reply", generators::source_page("Reply", &[])).await;
    let source = format!("{}/reply", server.uri());
    let (app, state) = app(Config::default());

    let response = app
        .oneshot(post(generators::ping_call(&[&source, TARGET])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("<int>17</int>"));
    assert_eq!(state.metrics.count("source_missing_backlink"), 1);
}

#[tokio::test]
async fn test_unknown_method_fault() {
    let (app, state) = app(Config::default());

    let response = app
        .oneshot(post(generators::other_method_call("demo.sayHello")))
        .await
        .unwrap();

    let body = body_text(response).await;
    assert!(body.contains("<int>-32601</int>"));
    assert_eq!(state.metrics.count("method_not_found"), 1);
}

#[tokio::test]
async fn test_non_utf8_body_is_parse_error() {
    let (app, state) = app(Config::default());

    let mut bytes = generators::ping_call(&["http://a.example/\u{e9}", TARGET]).into_bytes();
    let accent = bytes
        .windows(2)
        .position(|w| w == "\u{e9}".as_bytes())
        .unwrap();
    // Latin-1 encoding of the same character
    bytes[accent] = 0xE9;
    bytes.remove(accent + 1);

    let request = Request::builder()
        .method("POST")
        .uri("/xmlrpc")
        .header("content-type", "text/xml")
        .header("content-length", bytes.len())
        .body(Body::from(bytes))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("<int>-32700</int>"));
    assert_eq!(state.metrics.count("parse_error"), 1);
}

#[tokio::test]
async fn test_spam_returns_not_found() {
    let server = sources::serve_page(
        "/spam",
        generators::source_page("<b>buy now</b>", &[TARGET]),
    )
    .await;
    let source = format!("{}/spam", server.uri());
    let (app, state) = app(Config::default());

    let response = app
        .oneshot(post(generators::ping_call(&[&source, TARGET])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.is_empty());
    assert_eq!(state.metrics.count("spam_suppressed"), 1);
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let mut config = Config::default();
    config.server.max_body_bytes = 256;
    let (app, _) = app(config);

    let padding = "x".repeat(1024);
    let response = app
        .oneshot(post(generators::ping_call(&[&padding, TARGET])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, state) = app(Config::default());
    state.metrics.observe("target_not_found");

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("pingback_requests_total{outcome=\"target_not_found\"} 1"));
}

#[tokio::test]
async fn test_metrics_disabled() {
    let mut config = Config::default();
    config.metrics.enabled = false;
    let (app, _) = app(config);

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
