// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Proxy HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the proxy.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use switchyard_config::SwitchyardConfig;
use switchyard_core::{RequestContext, SwitchyardError, UsageLedger};
use switchyard_router::ModelRouter;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Upper bound on establishing the upstream TCP/TLS connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Health state for the health and metrics endpoints.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    /// Optional Prometheus metrics render function.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

impl HealthState {
    pub fn new(prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>) -> Self {
        Self {
            start_time: std::time::Instant::now(),
            prometheus_render,
        }
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Classifier-backed model router.
    pub router: Arc<ModelRouter>,
    /// Pooled upstream HTTP client.
    pub client: reqwest::Client,
    /// Full URL of the upstream chat-completion endpoint.
    pub upstream_url: String,
    /// Key sent upstream when the client supplies no `Authorization` header.
    pub api_key: Option<String>,
    /// Interval between keep-alive pings on open streams.
    pub keepalive: Duration,
    /// Receives one entry per relayed request.
    pub ledger: Arc<dyn UsageLedger>,
    /// Audit and offline switches.
    pub ctx: RequestContext,
    /// Health state for unauthenticated endpoints.
    pub health: HealthState,
}

impl GatewayState {
    /// Build handler state from validated configuration.
    pub fn from_config(
        config: &SwitchyardConfig,
        ledger: Arc<dyn UsageLedger>,
        health: HealthState,
    ) -> Result<Self, SwitchyardError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(Duration::from_secs(config.provider.timeout_secs))
            .build()
            .map_err(|e| SwitchyardError::Server {
                message: format!("failed to build upstream client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            router: Arc::new(ModelRouter::new(config.routing.clone())),
            client,
            upstream_url: config.provider.chat_url(),
            api_key: config.provider.api_key.clone(),
            keepalive: Duration::from_secs(config.server.keepalive_secs),
            ledger,
            ctx: RequestContext {
                audit: config.proxy.audit,
                offline: config.proxy.offline,
            },
            health,
        })
    }
}

/// Assemble the proxy's routes:
/// - POST /v1/chat/completions
/// - GET /health
/// - GET /metrics
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/v1/chat/completions", post(handlers::post_chat_completions))
        .route("/health", get(handlers::get_public_health))
        .route("/metrics", get(handlers::get_public_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `host:port` and serve until `shutdown` is cancelled.
///
/// In-flight streams are allowed to finish after shutdown begins.
pub async fn start_server(
    host: &str,
    port: u16,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), SwitchyardError> {
    let app = build_router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SwitchyardError::Server {
            message: format!("failed to bind proxy to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("proxy listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| SwitchyardError::Server {
            message: format!("proxy server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("proxy server stopped");
    Ok(())
}
