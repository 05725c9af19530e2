//! Metrics and monitoring for the retro-leaderboard service
//!
//! Prometheus collectors for HTTP traffic, cache behaviour and ranking cost.
//! The `/metrics` endpoint is served by the HTTP server module.

pub mod collector;

pub use collector::{
    CacheMetrics, LeaderboardMetrics, MetricsCollector, MetricsTimer, ServiceMetrics,
};
