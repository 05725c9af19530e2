//! Main application state and service coordination
//!
//! This module contains the production AppState that wires the statistics
//! provider, cache, metrics and leaderboard service together and manages
//! background tasks.

use crate::cache::{InMemoryStatsCache, StatsCache};
use crate::config::{validate_config, AppConfig};
use crate::metrics::MetricsCollector;
use crate::service::leaderboard::LeaderboardService;
use crate::stats::{StaticStatisticsProvider, StatisticsProvider};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },

    #[error("Background task error: {message}")]
    BackgroundTask { message: String },
}

/// Main application state containing all service components
pub struct AppState {
    /// Application configuration
    config: AppConfig,

    /// Leaderboard request path
    leaderboard: Arc<LeaderboardService>,

    /// Prometheus metrics
    metrics: Arc<MetricsCollector>,

    /// Background task handles
    background_tasks: Mutex<Vec<JoinHandle<()>>>,

    /// Service status
    is_running: Arc<RwLock<bool>>,

    started_at: Instant,
}

impl AppState {
    /// Initialize the application from configuration
    pub async fn new(config: AppConfig) -> Result<Self, ServiceError> {
        info!("Initializing retro-leaderboard service");

        let provider = Self::initialize_provider(&config)?;
        let cache: Arc<dyn StatsCache> = Arc::new(InMemoryStatsCache::new(config.cache.ttl()));

        Self::with_components(config, provider, cache)
    }

    /// Build the application around an explicit provider and cache
    pub fn with_components(
        config: AppConfig,
        provider: Arc<dyn StatisticsProvider>,
        cache: Arc<dyn StatsCache>,
    ) -> Result<Self, ServiceError> {
        validate_config(&config).map_err(|e| ServiceError::Configuration {
            message: format!("{:#}", e),
        })?;

        let metrics = Arc::new(
            MetricsCollector::new().map_err(|e| ServiceError::Initialization {
                message: format!("Failed to create metrics collector: {}", e),
            })?,
        );

        info!(
            "Configuration: service={}, provider={}, cache_ttl={}s, yearly_tie_break={}",
            config.service.name,
            provider.name(),
            config.cache.ttl_seconds,
            config.ranking.yearly_secondary_tie_break
        );

        let leaderboard = Arc::new(LeaderboardService::new(
            provider,
            cache,
            metrics.clone(),
            config.ranking.clone(),
        ));

        Ok(Self {
            config,
            leaderboard,
            metrics,
            background_tasks: Mutex::new(Vec::new()),
            is_running: Arc::new(RwLock::new(false)),
            started_at: Instant::now(),
        })
    }

    fn initialize_provider(config: &AppConfig) -> Result<Arc<dyn StatisticsProvider>, ServiceError> {
        match &config.stats.seed_file {
            Some(path) => {
                info!("Seeding static statistics provider from {}", path.display());
                let provider = StaticStatisticsProvider::from_seed_file(path).map_err(|e| {
                    ServiceError::Configuration {
                        message: format!("Failed to load stats seed file: {:#}", e),
                    }
                })?;
                Ok(Arc::new(provider))
            }
            None => {
                warn!("No stats seed file configured - serving empty leaderboards");
                Ok(Arc::new(StaticStatisticsProvider::new()))
            }
        }
    }

    /// Start background maintenance tasks
    pub async fn start(&self) -> Result<(), ServiceError> {
        info!("Starting retro-leaderboard service");

        *self.is_running.write().await = true;
        self.start_background_tasks().await;

        info!("✅ Retro-leaderboard service started successfully");
        Ok(())
    }

    /// Perform graceful shutdown
    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        info!("Starting graceful shutdown of retro-leaderboard service");

        *self.is_running.write().await = false;
        self.stop_background_tasks().await;

        let cache_entries =
            self.leaderboard
                .cache()
                .len()
                .map_err(|e| ServiceError::BackgroundTask {
                    message: format!("Failed to read final cache size: {}", e),
                })?;

        info!("Final cache entries: {}", cache_entries);
        info!("✅ Retro-leaderboard service shutdown completed");
        Ok(())
    }

    /// Get service configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Check if service is running
    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    pub fn leaderboard(&self) -> Arc<LeaderboardService> {
        self.leaderboard.clone()
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    async fn start_background_tasks(&self) {
        info!(
            "Starting cache purge task ({}s interval)...",
            self.config.cache.purge_interval().as_secs()
        );
        let purge_task = {
            let leaderboard = self.leaderboard.clone();
            let purge_interval = self.config.cache.purge_interval();
            let is_running = self.is_running.clone();

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(purge_interval);
                info!("Cache purge task started");

                while *is_running.read().await {
                    interval.tick().await;

                    match leaderboard.purge_expired() {
                        Ok(purged) if purged > 0 => {
                            info!("Purged {} expired cache entries", purged);
                        }
                        Ok(_) => debug!("Cache purge completed - nothing expired"),
                        Err(e) => warn!("Cache purge failed: {}", e),
                    }
                }

                info!("Cache purge task stopped");
            })
        };

        info!("Starting uptime metrics task (60s interval)...");
        let uptime_task = {
            let metrics = self.metrics.clone();
            let is_running = self.is_running.clone();
            let started_at = self.started_at;

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(Duration::from_secs(60));

                while *is_running.read().await {
                    interval.tick().await;

                    let uptime_seconds = started_at.elapsed().as_secs() as i64;
                    metrics.service().uptime_seconds.set(uptime_seconds);
                    debug!("Updated uptime metric - {}s", uptime_seconds);
                }
            })
        };

        let mut tasks = self.background_tasks.lock().await;
        tasks.push(purge_task);
        tasks.push(uptime_task);

        info!(
            "{} background maintenance tasks started successfully",
            tasks.len()
        );
    }

    async fn stop_background_tasks(&self) {
        let mut tasks = self.background_tasks.lock().await;
        let task_count = tasks.len();
        if task_count == 0 {
            info!("No background tasks to stop");
            return;
        }

        info!("Stopping {} background tasks...", task_count);
        for (i, task) in tasks.drain(..).enumerate() {
            debug!("Aborting background task {}/{}", i + 1, task_count);
            task.abort();
        }

        info!("✅ All {} background tasks stopped", task_count);
    }
}
