// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the pingback receiver service.

use crate::config::Config;
use crate::metrics::PingbackMetrics;
use crate::payload::ValidationOutcome;
use crate::service::{PingbackResult, PingbackService};
use crate::xmlrpc::XmlRpcResponse;
use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

/// Shared application state.
pub struct AppState {
    pub service: PingbackService,
    pub metrics: PingbackMetrics,
    pub config: Config,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/xmlrpc", post(pingback))
        .route("/pingback", post(pingback));

    if state.config.metrics.enabled {
        app = app.route(&state.config.metrics.path, get(metrics));
    }

    app.layer(RequestBodyLimitLayer::new(state.config.server.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "pingback-receiver",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// XML-RPC endpoint accepting `pingback.ping` calls.
pub async fn pingback(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> XmlRpcResponse {
    let remote_ip = client_ip(&headers, addr, state.config.server.trust_forwarded_for);

    debug!(remote_ip = %remote_ip, bytes = body.len(), "Processing pingback request");

    let result = match std::str::from_utf8(&body) {
        Ok(raw_body) => state.service.process(raw_body, &remote_ip).await,
        Err(err) => {
            debug!(remote_ip = %remote_ip, error = %err, "Pingback body is not UTF-8");
            PingbackResult::Rejected(ValidationOutcome::ParseError)
        }
    };
    state.metrics.observe(result.label());

    XmlRpcResponse::from(&result)
}

/// Prometheus metrics endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.render() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(err) => {
            warn!(error = %err, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Client address, from `X-Forwarded-For` when the proxy is trusted.
fn client_ip(headers: &HeaderMap, peer: SocketAddr, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }
    peer.ip().to_string()
}
