//! HTTP server for leaderboards, health checks and Prometheus metrics
//!
//! Serves the ranked boards consumed by the embedding dashboard alongside
//! the operational endpoints, using Axum.

pub mod routes;

pub use routes::{ApiError, LeaderboardQuery, ServerState};

use crate::service::AppState;
use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Build the Axum router with all endpoints
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::root_handler))
        .route("/leaderboard/{mode}", get(routes::leaderboard_handler))
        .route("/health", get(routes::health_handler))
        .route("/ready", get(routes::ready_handler))
        .route("/alive", get(routes::alive_handler))
        .route("/stats", get(routes::stats_handler))
        .route("/metrics", get(routes::metrics_handler))
        .with_state(ServerState { app_state })
}

/// HTTP server with graceful shutdown
pub struct HttpServer {
    addr: String,
    app_state: Arc<AppState>,
    shutdown_tx: broadcast::Sender<()>,
}

impl HttpServer {
    pub fn new(app_state: Arc<AppState>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            addr: app_state.config().http_addr(),
            app_state,
            shutdown_tx,
        }
    }

    /// Serve until [`HttpServer::stop`] is called
    pub async fn start(&self) -> Result<()> {
        let addr: SocketAddr = self
            .addr
            .parse()
            .with_context(|| format!("Invalid HTTP server address: {}", self.addr))?;

        let app = create_router(self.app_state.clone());
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind HTTP server to {}", addr))?;

        info!("HTTP server listening on http://{}", addr);

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("HTTP server shutdown signal received");
            })
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }

    pub fn stop(&self) {
        if let Err(e) = self.shutdown_tx.send(()) {
            warn!("Failed to send shutdown signal to HTTP server: {}", e);
        }
    }
}
