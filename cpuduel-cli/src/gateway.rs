// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! HTTP Gateway for cpuduel.
//!
//! Serves the liveness probe, the two benchmark endpoints and the metrics
//! exposition. `GET /api/worker-cpu` runs the task directly;
//! `GET /api/do-cpu` forwards to the singleton actor and relays its reply.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use cpuduel_core::{Config, Mode, RawCpuQuery};

use crate::dispatch::Dispatcher;
use crate::metrics;

/// Gateway state shared across threads
#[derive(Clone)]
pub struct GatewayState {
    dispatcher: Dispatcher,
    service_name: Arc<str>,
}

impl GatewayState {
    pub fn new(dispatcher: Dispatcher, service_name: impl Into<Arc<str>>) -> Self {
        Self {
            dispatcher,
            service_name: service_name.into(),
        }
    }

    /// State built from a validated configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Dispatcher::new(config),
            config.server.service_name.as_str(),
        )
    }
}

#[derive(Serialize)]
struct Liveness<'a> {
    name: &'a str,
}

/// Build the gateway router.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/api", get(liveness))
        .route("/api/", get(liveness))
        .route("/api/worker-cpu", get(worker_cpu))
        .route("/api/do-cpu", get(do_cpu))
        .route("/metrics", get(metrics_endpoint))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_gateway(config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    metrics::init();

    let app = router(GatewayState::from_config(config));
    let addr = config.server.listen;

    tracing::info!("Gateway listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down gateway");
}

async fn liveness(State(state): State<GatewayState>) -> impl IntoResponse {
    Json(Liveness {
        name: &state.service_name,
    })
    .into_response()
}

async fn worker_cpu(
    State(state): State<GatewayState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    state
        .dispatcher
        .dispatch(Mode::Worker, RawCpuQuery::from_pairs(pairs))
        .await
}

async fn do_cpu(
    State(state): State<GatewayState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    state
        .dispatcher
        .dispatch(Mode::DurableObject, RawCpuQuery::from_pairs(pairs))
        .await
}

async fn metrics_endpoint() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::render(),
    )
}
