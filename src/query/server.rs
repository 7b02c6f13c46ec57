//! HTTP endpoints for the query service
//!
//! Read-only JSON API over the exported tables, plus health and Prometheus
//! metrics endpoints, served with Axum.

use crate::config::ServerSettings;
use crate::error::FightEloError;
use crate::metrics::collector::{MetricsCollector, MetricsTimer};
use crate::query::service::QueryService;
use crate::query::source::TableResult;
use crate::service::health::{HealthCheck, HealthStatus};
use crate::stats::StatsMetric;
use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Shared state for the query server
#[derive(Clone)]
pub struct ServerState {
    pub query: QueryService,
    pub metrics: Arc<MetricsCollector>,
    pub service_name: String,
}

/// Response envelope used by every data endpoint
#[derive(Debug, Serialize)]
struct Envelope<T: Serialize> {
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
    pub sort: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NeighborParams {
    pub radius: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

/// Query server that serves the exported tables over HTTP
pub struct QueryServer {
    config: ServerSettings,
    state: ServerState,
    shutdown_tx: broadcast::Sender<()>,
}

impl QueryServer {
    /// Create a new query server
    pub fn new(config: ServerSettings, state: ServerState) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            state,
            shutdown_tx,
        }
    }

    /// Start serving until [`QueryServer::stop`] is called
    pub async fn start(&self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .context("Invalid query server address")?;

        let app = self.router();
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        info!("Query server listening on http://{}", addr);

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("Query server shutdown signal received");
            })
            .await?;

        info!("Query server stopped");
        Ok(())
    }

    /// Create the Axum router with all endpoints
    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// Stop the query server
    pub async fn stop(&self) -> Result<()> {
        info!("Stopping query server...");

        if let Err(e) = self.shutdown_tx.send(()) {
            warn!("Failed to send shutdown signal to query server: {}", e);
        }

        Ok(())
    }
}

/// Build the router over the given state
pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/ratings", get(ratings_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/search", get(search_handler))
        .route("/api/competitors/{name}", get(competitor_handler))
        .route(
            "/api/competitors/{name}/neighbors",
            get(neighbors_handler),
        )
        .route("/api/competitors/{name}/history", get(history_handler))
        .with_state(state)
}

fn status_for(error: &FightEloError) -> StatusCode {
    match error {
        FightEloError::TableUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        FightEloError::CompetitorNotFound { .. } => StatusCode::NOT_FOUND,
        FightEloError::ConfigurationError { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Turn a query result into an enveloped response and record it
///
/// `empty` is the `data` value sent alongside an error.
fn respond<T: Serialize>(
    state: &ServerState,
    endpoint: &str,
    timer: MetricsTimer,
    result: TableResult<T>,
    empty: serde_json::Value,
) -> Response {
    let (status, response) = match result {
        Ok(data) => (
            StatusCode::OK,
            Json(Envelope { data, error: None }).into_response(),
        ),
        Err(e) => {
            let status = status_for(&e);
            match &e {
                FightEloError::TableUnavailable { table, .. } => {
                    warn!("{} request failed: {}", endpoint, e);
                    state.metrics.record_table_failure(table);
                }
                FightEloError::CompetitorNotFound { .. } => debug!("{}: {}", endpoint, e),
                _ => error!("{} request failed: {}", endpoint, e),
            }
            (
                status,
                (
                    status,
                    Json(Envelope {
                        data: empty,
                        error: Some(e.to_string()),
                    }),
                )
                    .into_response(),
            )
        }
    };

    state
        .metrics
        .record_request(endpoint, status.as_u16(), timer.stop());
    response
}

/// Root endpoint handler - shows service information
async fn root_handler(State(state): State<ServerState>) -> impl IntoResponse {
    Json(json!({
        "service": state.service_name,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/health",
            "/metrics",
            "/api/ratings",
            "/api/stats",
            "/api/search",
            "/api/competitors/{name}",
            "/api/competitors/{name}/neighbors",
            "/api/competitors/{name}/history"
        ]
    }))
}

/// Health check endpoint handler
async fn health_handler(State(state): State<ServerState>) -> impl IntoResponse {
    debug!("Health check requested");

    let source = state.query.source();
    let health = HealthCheck::check(source.as_ref(), &state.service_name).await;

    state
        .metrics
        .update_health_status(health.status.as_gauge());
    for check in &health.checks {
        state
            .metrics
            .update_component_health(&check.name, check.status == HealthStatus::Healthy);
    }

    let status = match health.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(health))
}

/// Prometheus metrics endpoint handler
async fn metrics_handler(State(state): State<ServerState>) -> Response {
    debug!("Metrics endpoint requested");

    let metric_families = state.metrics.registry().gather();
    let encoder = TextEncoder::new();

    match encoder.encode_to_string(&metric_families) {
        Ok(metrics_output) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, encoder.format_type().to_string())],
            metrics_output,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to encode metrics".to_string(),
            )
                .into_response()
        }
    }
}

async fn ratings_handler(
    State(state): State<ServerState>,
    Query(params): Query<LimitParams>,
) -> Response {
    let timer = state.metrics.start_timer();
    let result = state.query.ratings(params.limit).await;
    respond(&state, "ratings", timer, result, json!([]))
}

async fn stats_handler(
    State(state): State<ServerState>,
    Query(params): Query<StatsParams>,
) -> Response {
    let timer = state.metrics.start_timer();
    let result = match params.sort.as_deref().map(str::parse::<StatsMetric>) {
        Some(Err(e)) => Err(e),
        Some(Ok(metric)) => state.query.stats(Some(metric), params.limit).await,
        None => state.query.stats(None, params.limit).await,
    };
    respond(&state, "stats", timer, result, json!([]))
}

async fn search_handler(
    State(state): State<ServerState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let timer = state.metrics.start_timer();
    let result = state
        .query
        .search(params.q.as_deref().unwrap_or(""), params.limit)
        .await;
    respond(&state, "search", timer, result, json!([]))
}

async fn competitor_handler(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> Response {
    let timer = state.metrics.start_timer();
    let result = state.query.competitor(&name).await;
    respond(&state, "competitor", timer, result, serde_json::Value::Null)
}

async fn neighbors_handler(
    State(state): State<ServerState>,
    Path(name): Path<String>,
    Query(params): Query<NeighborParams>,
) -> Response {
    let timer = state.metrics.start_timer();
    let result = state.query.neighbors(&name, params.radius).await;
    respond(&state, "neighbors", timer, result, json!([]))
}

async fn history_handler(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> Response {
    let timer = state.metrics.start_timer();
    let result = state.query.history(&name).await;
    respond(&state, "history", timer, result, json!([]))
}
