//! Main application configuration
//!
//! This module defines the primary configuration structures for the
//! retro-leaderboard service, including environment variable loading,
//! TOML file loading and validation.

use crate::config::cache::CacheConfig;
use crate::config::ranking::RankingConfig;
use crate::error::LeaderboardError;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub cache: CacheConfig,
    pub ranking: RankingConfig,
    pub stats: StatsSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Host the HTTP server binds to
    pub http_host: String,
    /// Port for leaderboard, health and metrics endpoints
    pub http_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

/// Statistics provider settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsSettings {
    /// TOML file seeding the static statistics provider
    pub seed_file: Option<PathBuf>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "retro-leaderboard".to_string(),
            log_level: "info".to_string(),
            http_host: "0.0.0.0".to_string(),
            http_port: 8080,
            shutdown_timeout_seconds: 30,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }
        if let Ok(host) = env::var("HTTP_HOST") {
            self.service.http_host = host;
        }
        if let Ok(port) = env::var("HTTP_PORT") {
            self.service.http_port = port
                .parse()
                .map_err(|_| anyhow!("Invalid HTTP_PORT value: {}", port))?;
        }
        if let Ok(timeout) = env::var("SHUTDOWN_TIMEOUT_SECONDS") {
            self.service.shutdown_timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid SHUTDOWN_TIMEOUT_SECONDS value: {}", timeout))?;
        }

        // Cache settings
        if let Ok(ttl) = env::var("CACHE_TTL_SECONDS") {
            self.cache.ttl_seconds = ttl
                .parse()
                .map_err(|_| anyhow!("Invalid CACHE_TTL_SECONDS value: {}", ttl))?;
        }
        if let Ok(interval) = env::var("CACHE_PURGE_INTERVAL_SECONDS") {
            self.cache.purge_interval_seconds = interval
                .parse()
                .map_err(|_| anyhow!("Invalid CACHE_PURGE_INTERVAL_SECONDS value: {}", interval))?;
        }

        // Ranking settings
        if let Ok(tie_break) = env::var("YEARLY_SECONDARY_TIE_BREAK") {
            self.ranking.yearly_secondary_tie_break = tie_break
                .parse()
                .map_err(|_| anyhow!("Invalid YEARLY_SECONDARY_TIE_BREAK value: {}", tie_break))?;
        }

        // Statistics settings
        if let Ok(seed_file) = env::var("STATS_SEED_FILE") {
            self.stats.seed_file = Some(PathBuf::from(seed_file));
        }

        Ok(())
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Address the HTTP server binds to
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.service.http_host, self.service.http_port)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => {
            return Err(config_error(format!(
                "Invalid log level: {}",
                config.service.log_level
            )))
        }
    }

    if config.service.name.is_empty() {
        return Err(config_error("Service name cannot be empty"));
    }
    if config.service.http_host.is_empty() {
        return Err(config_error("HTTP host cannot be empty"));
    }
    if config.service.http_port == 0 {
        return Err(config_error("HTTP port cannot be 0"));
    }
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(config_error("Shutdown timeout must be greater than 0"));
    }

    // A zero TTL is allowed (caching disabled) but the purge loop needs a period
    if config.cache.purge_interval_seconds == 0 {
        return Err(config_error("Cache purge interval must be greater than 0"));
    }

    Ok(())
}

fn config_error(message: impl Into<String>) -> anyhow::Error {
    LeaderboardError::ConfigurationError {
        message: message.into(),
    }
    .into()
}
