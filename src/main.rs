// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Pingback Receiver Service
//!
//! An XML-RPC endpoint for Pingback 1.0 notifications. Each call is
//! validated, its source document fetched and checked for a link to the
//! target, and the result returned as a pingback fault or success.
//!
//! ## Endpoints
//!
//! - `POST /xmlrpc` (alias `/pingback`): `pingback.ping` calls
//! - `GET /health`, `GET /healthz`: liveness
//! - `GET /metrics`: Prometheus outcome counters
//!
//! ## Configuration
//!
//! Configuration is loaded from a JSON file named by `CONFIG_FILE`, then
//! overridden by environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `FETCH_TIMEOUT_SECS`: Source fetch timeout (default: 30)
//! - `PINGBACK_TARGETS`: Comma-separated target URLs accepting pingbacks
//! - `TRUST_FORWARDED_FOR`: Read client address from `X-Forwarded-For`

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pingback_receiver::{
    config::Config,
    examiner::SourceExaminer,
    handlers::{router, AppState},
    metrics::PingbackMetrics,
    service::{spawn_recorder, PingbackService},
    store::{MemoryStore, PingbackStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        fetch_timeout_secs = config.fetch.timeout_secs,
        targets = config.targets.len(),
        "Starting pingback receiver"
    );

    let store: Arc<dyn PingbackStore> = Arc::new(MemoryStore::with_targets(&config.targets));

    // Success events are persisted off the request path
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let recorder = spawn_recorder(store.clone(), events_rx);

    let examiner = SourceExaminer::new(&config.fetch)?;
    let state = Arc::new(AppState {
        service: PingbackService::new(examiner, store, events_tx),
        metrics: PingbackMetrics::new()?,
        config: config.clone(),
    });

    let app = router(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router held the last sender; the recorder drains what is queued
    recorder.await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = ctrl_c().await {
            warn!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                warn!(error = %err, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
