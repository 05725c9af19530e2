//! HTTP handlers for leaderboards, health probes and metrics

use crate::error::LeaderboardError;
use crate::presentation::Leaderboard;
use crate::service::{AppState, HealthCheck, HealthStatus};
use crate::types::{Period, RankingMode};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use prometheus::{Encoder, TextEncoder};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Shared state for all handlers
#[derive(Clone)]
pub struct ServerState {
    pub app_state: Arc<AppState>,
}

/// Query string for leaderboard requests
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    /// `YYYY-MM` for monthly boards, `YYYY` for yearly boards
    pub period: Option<String>,
}

/// Error response carrying the mapped HTTP status
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<LeaderboardError>() {
            Some(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Some(LeaderboardError::ProviderUnavailable { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {:#}", self.0);
        } else {
            debug!("Rejected request: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Root endpoint handler - shows service information
pub async fn root_handler(State(state): State<ServerState>) -> impl IntoResponse {
    Json(json!({
        "service": state.app_state.config().service.name,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/leaderboard/monthly",
            "/leaderboard/yearly",
            "/health",
            "/ready",
            "/alive",
            "/stats",
            "/metrics"
        ]
    }))
}

/// Ranked leaderboard for a mode and optional period
pub async fn leaderboard_handler(
    State(state): State<ServerState>,
    Path(mode): Path<String>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Response, ApiError> {
    let metrics = state.app_state.metrics();

    let result = build_leaderboard(&state, &mode, query).await;

    match result {
        Ok(board) => {
            metrics.record_http_request("leaderboard", StatusCode::OK.as_u16());
            Ok(Json(board).into_response())
        }
        Err(e) => {
            let err = ApiError::from(e);
            metrics.record_http_request("leaderboard", err.status().as_u16());
            Err(err)
        }
    }
}

async fn build_leaderboard(
    state: &ServerState,
    mode: &str,
    query: LeaderboardQuery,
) -> crate::error::Result<Leaderboard> {
    let mode: RankingMode = mode.parse()?;
    let period = query
        .period
        .as_deref()
        .map(str::parse::<Period>)
        .transpose()?;

    state
        .app_state
        .leaderboard()
        .leaderboard(mode, period)
        .await
}

/// Lightweight health check endpoint handler
pub async fn health_handler(State(state): State<ServerState>) -> impl IntoResponse {
    debug!("Health check requested");

    let (status, label) = match HealthCheck::liveness_check(state.app_state.clone()).await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "healthy"),
        Ok(HealthStatus::Degraded) => (StatusCode::OK, "degraded"),
        Ok(HealthStatus::Unhealthy) | Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy"),
    };

    (
        status,
        Json(json!({
            "status": label,
            "service": state.app_state.config().service.name,
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness check endpoint handler
pub async fn ready_handler(State(state): State<ServerState>) -> impl IntoResponse {
    debug!("Readiness check requested");

    match HealthCheck::readiness_check(state.app_state.clone()).await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "Ready"),
        Ok(HealthStatus::Degraded) => (StatusCode::OK, "Degraded but ready"),
        Ok(HealthStatus::Unhealthy) => (StatusCode::SERVICE_UNAVAILABLE, "Not ready"),
        Err(e) => {
            error!("Readiness check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Not ready")
        }
    }
}

/// Liveness check endpoint handler
pub async fn alive_handler(State(state): State<ServerState>) -> impl IntoResponse {
    match HealthCheck::liveness_check(state.app_state.clone()).await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "Alive"),
        _ => (StatusCode::SERVICE_UNAVAILABLE, "Not alive"),
    }
}

/// Detailed health report
pub async fn stats_handler(State(state): State<ServerState>) -> Response {
    match HealthCheck::check(state.app_state.clone()).await {
        Ok(health) => {
            let status = if health.status == HealthStatus::Unhealthy {
                StatusCode::SERVICE_UNAVAILABLE
            } else {
                StatusCode::OK
            };
            (status, Json(health)).into_response()
        }
        Err(e) => {
            warn!("Failed to build health report: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// Prometheus metrics endpoint handler
pub async fn metrics_handler(State(state): State<ServerState>) -> Response {
    let registry = state.app_state.metrics().registry();
    let metric_families = registry.gather();
    let encoder = TextEncoder::new();

    match encoder.encode_to_string(&metric_families) {
        Ok(metrics_output) => {
            debug!("Serving {} metric families", metric_families.len());
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, encoder.format_type().to_string())],
                metrics_output,
            )
                .into_response()
        }
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
