//! Configuration management for the retro-leaderboard service
//!
//! This module handles configuration loading from environment variables and
//! TOML files, validation, and default values.

pub mod app;
pub mod cache;
pub mod ranking;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings, StatsSettings};
pub use cache::CacheConfig;
pub use ranking::RankingConfig;
