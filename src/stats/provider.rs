//! Statistics provider trait and implementations
//!
//! A provider returns raw per-participant statistics for a period. The
//! production datastore and third-party APIs sit behind this trait; the
//! static implementation serves in-memory data, optionally seeded from a
//! TOML file.

use crate::error::{LeaderboardError, Result};
use crate::stats::models::ParticipantStats;
use crate::types::Period;
use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use tracing::{debug, info};

/// Trait for sources of participant statistics
#[async_trait]
pub trait StatisticsProvider: Send + Sync {
    /// Fetch all participant statistics for a period
    ///
    /// A period with no data yields an empty list, not an error.
    async fn fetch_stats(&self, period: &Period) -> Result<Vec<ParticipantStats>>;

    /// Provider name for logs and health output
    fn name(&self) -> &str;
}

/// One period's worth of seeded statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedPeriod {
    pub period: Period,
    #[serde(default)]
    pub participants: Vec<ParticipantStats>,
}

/// Seed file layout: a list of `[[periods]]` tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub periods: Vec<SeedPeriod>,
}

/// In-memory statistics provider
#[derive(Debug, Default)]
pub struct StaticStatisticsProvider {
    stats: RwLock<HashMap<Period, Vec<ParticipantStats>>>,
}

impl StaticStatisticsProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider holding the periods of a parsed seed file
    pub fn from_seed(seed: SeedFile) -> Self {
        let stats = seed
            .periods
            .into_iter()
            .map(|p| (p.period, p.participants))
            .collect();
        Self {
            stats: RwLock::new(stats),
        }
    }

    /// Load a provider from a TOML seed file
    pub fn from_seed_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stats seed file {}", path.display()))?;
        let seed: SeedFile = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse stats seed file {}", path.display()))?;

        info!(
            "Loaded {} seeded periods from {}",
            seed.periods.len(),
            path.display()
        );
        Ok(Self::from_seed(seed))
    }

    /// Replace the statistics for a period
    pub fn set_stats(&self, period: Period, stats: Vec<ParticipantStats>) -> Result<()> {
        let mut all = self
            .stats
            .write()
            .map_err(|_| LeaderboardError::InternalError {
                message: "Failed to acquire stats write lock".to_string(),
            })?;

        all.insert(period, stats);
        Ok(())
    }

    /// Remove every period
    pub fn clear(&self) -> Result<()> {
        let mut all = self
            .stats
            .write()
            .map_err(|_| LeaderboardError::InternalError {
                message: "Failed to acquire stats write lock".to_string(),
            })?;

        all.clear();
        Ok(())
    }

    /// Number of periods with data
    pub fn period_count(&self) -> Result<usize> {
        let all = self
            .stats
            .read()
            .map_err(|_| LeaderboardError::InternalError {
                message: "Failed to acquire stats read lock".to_string(),
            })?;

        Ok(all.len())
    }
}

#[async_trait]
impl StatisticsProvider for StaticStatisticsProvider {
    async fn fetch_stats(&self, period: &Period) -> Result<Vec<ParticipantStats>> {
        let all = self
            .stats
            .read()
            .map_err(|_| LeaderboardError::ProviderUnavailable {
                message: "Failed to acquire stats read lock".to_string(),
            })?;

        let stats = all.get(period).cloned().unwrap_or_default();
        debug!("Static provider returned {} participants for {}", stats.len(), period);
        Ok(stats)
    }

    fn name(&self) -> &str {
        "static"
    }
}
