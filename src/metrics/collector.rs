//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for the retro-leaderboard
//! service: HTTP traffic, statistics cache behaviour and ranking cost.

use crate::types::RankingMode;
use anyhow::Result;
use prometheus::{
    Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the leaderboard service
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Service-level metrics
    service_metrics: ServiceMetrics,

    /// Statistics cache metrics
    cache_metrics: CacheMetrics,

    /// Provider and ranking metrics
    leaderboard_metrics: LeaderboardMetrics,
}

/// Service-level metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    /// Service uptime in seconds
    pub uptime_seconds: IntGauge,

    /// HTTP requests by endpoint and status code
    pub http_requests_total: IntCounterVec,

    /// Health check status (0=unhealthy, 1=degraded, 2=healthy)
    pub health_status: IntGauge,
}

/// Statistics cache metrics
#[derive(Clone)]
pub struct CacheMetrics {
    /// Cache hits by board mode
    pub hits_total: IntCounterVec,

    /// Cache misses by board mode
    pub misses_total: IntCounterVec,

    /// Entries currently stored
    pub entries: IntGauge,

    /// Expired entries removed by the purge task
    pub purged_total: IntCounter,
}

/// Provider and ranking metrics
#[derive(Clone)]
pub struct LeaderboardMetrics {
    /// Boards served by mode
    pub boards_served_total: IntCounterVec,

    /// Provider fetch duration by provider
    pub provider_fetch_duration: HistogramVec,

    /// Provider failures by provider
    pub provider_errors_total: IntCounterVec,

    /// Time spent ranking and presenting one board
    pub ranking_duration: Histogram,

    /// Participants per ranked board
    pub participants_per_board: Histogram,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let service_metrics = ServiceMetrics::new(&registry)?;
        let cache_metrics = CacheMetrics::new(&registry)?;
        let leaderboard_metrics = LeaderboardMetrics::new(&registry)?;

        Ok(Self {
            registry,
            service_metrics,
            cache_metrics,
            leaderboard_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn service(&self) -> &ServiceMetrics {
        &self.service_metrics
    }

    pub fn cache(&self) -> &CacheMetrics {
        &self.cache_metrics
    }

    pub fn leaderboard(&self) -> &LeaderboardMetrics {
        &self.leaderboard_metrics
    }

    /// Record a cache lookup
    pub fn record_cache_lookup(&self, mode: RankingMode, hit: bool) {
        let mode = mode.to_string();
        if hit {
            self.cache_metrics.hits_total.with_label_values(&[mode.as_str()]).inc();
        } else {
            self.cache_metrics
                .misses_total
                .with_label_values(&[mode.as_str()])
                .inc();
        }
    }

    /// Record a purge pass and the remaining entry count
    pub fn record_cache_purge(&self, purged: usize, remaining: usize) {
        self.cache_metrics.purged_total.inc_by(purged as u64);
        self.record_cache_size(remaining);
    }

    /// Record the number of entries currently held by the cache
    pub fn record_cache_size(&self, entries: usize) {
        self.cache_metrics.entries.set(entries as i64);
    }

    /// Record a provider fetch
    pub fn record_provider_fetch(&self, provider: &str, success: bool, duration: Duration) {
        self.leaderboard_metrics
            .provider_fetch_duration
            .with_label_values(&[provider])
            .observe(duration.as_secs_f64());

        if !success {
            self.leaderboard_metrics
                .provider_errors_total
                .with_label_values(&[provider])
                .inc();
        }
    }

    /// Record a ranked board being served
    pub fn record_board_served(&self, mode: RankingMode, participants: usize, duration: Duration) {
        self.leaderboard_metrics
            .boards_served_total
            .with_label_values(&[mode.to_string().as_str()])
            .inc();
        self.leaderboard_metrics
            .participants_per_board
            .observe(participants as f64);
        self.leaderboard_metrics
            .ranking_duration
            .observe(duration.as_secs_f64());
    }

    /// Record an HTTP response
    pub fn record_http_request(&self, endpoint: &str, status: u16) {
        self.service_metrics
            .http_requests_total
            .with_label_values(&[endpoint, status.to_string().as_str()])
            .inc();
    }

    /// Update health status (0=unhealthy, 1=degraded, 2=healthy)
    pub fn update_health_status(&self, status: u8) {
        self.service_metrics.health_status.set(status as i64);
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl ServiceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let uptime_seconds = IntGauge::new(
            "retro_leaderboard_uptime_seconds",
            "Service uptime in seconds",
        )?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        let http_requests_total = IntCounterVec::new(
            Opts::new(
                "retro_leaderboard_http_requests_total",
                "HTTP requests by endpoint and status",
            ),
            &["endpoint", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let health_status = IntGauge::new(
            "retro_leaderboard_health_status",
            "Health status (0=unhealthy, 1=degraded, 2=healthy)",
        )?;
        registry.register(Box::new(health_status.clone()))?;

        Ok(Self {
            uptime_seconds,
            http_requests_total,
            health_status,
        })
    }
}

impl CacheMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let hits_total = IntCounterVec::new(
            Opts::new("retro_leaderboard_cache_hits_total", "Statistics cache hits"),
            &["mode"],
        )?;
        registry.register(Box::new(hits_total.clone()))?;

        let misses_total = IntCounterVec::new(
            Opts::new(
                "retro_leaderboard_cache_misses_total",
                "Statistics cache misses",
            ),
            &["mode"],
        )?;
        registry.register(Box::new(misses_total.clone()))?;

        let entries = IntGauge::new(
            "retro_leaderboard_cache_entries",
            "Statistics cache entries currently stored",
        )?;
        registry.register(Box::new(entries.clone()))?;

        let purged_total = IntCounter::new(
            "retro_leaderboard_cache_purged_total",
            "Expired cache entries purged",
        )?;
        registry.register(Box::new(purged_total.clone()))?;

        Ok(Self {
            hits_total,
            misses_total,
            entries,
            purged_total,
        })
    }
}

impl LeaderboardMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let boards_served_total = IntCounterVec::new(
            Opts::new(
                "retro_leaderboard_boards_served_total",
                "Leaderboards served",
            ),
            &["mode"],
        )?;
        registry.register(Box::new(boards_served_total.clone()))?;

        let provider_fetch_duration = HistogramVec::new(
            HistogramOpts::new(
                "retro_leaderboard_provider_fetch_duration_seconds",
                "Statistics provider fetch duration",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["provider"],
        )?;
        registry.register(Box::new(provider_fetch_duration.clone()))?;

        let provider_errors_total = IntCounterVec::new(
            Opts::new(
                "retro_leaderboard_provider_errors_total",
                "Statistics provider failures",
            ),
            &["provider"],
        )?;
        registry.register(Box::new(provider_errors_total.clone()))?;

        let ranking_duration = Histogram::with_opts(
            HistogramOpts::new(
                "retro_leaderboard_ranking_duration_seconds",
                "Ranking and presentation time per board",
            )
            .buckets(vec![0.00001, 0.0001, 0.001, 0.005, 0.01, 0.05]),
        )?;
        registry.register(Box::new(ranking_duration.clone()))?;

        let participants_per_board = Histogram::with_opts(
            HistogramOpts::new(
                "retro_leaderboard_participants_per_board",
                "Participants per ranked board",
            )
            .buckets(vec![1.0, 10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0]),
        )?;
        registry.register(Box::new(participants_per_board.clone()))?;

        Ok(Self {
            boards_served_total,
            provider_fetch_duration,
            provider_errors_total,
            ranking_duration,
            participants_per_board,
        })
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new().expect("Failed to create default metrics collector")
    }
}
