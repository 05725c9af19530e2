//! Leaderboard request path: cache, provider, ranking and presentation
//!
//! Statistics are cached per board and period; ranks are always recomputed
//! from the (possibly cached) statistics so no rank state outlives a
//! request.

use crate::cache::{CacheKey, StatsCache, StatsSnapshot};
use crate::config::RankingConfig;
use crate::error::{LeaderboardError, Result};
use crate::metrics::MetricsCollector;
use crate::presentation::{present, Leaderboard};
use crate::ranking::{compute_ranks_with, RankingPolicy};
use crate::stats::{to_records, StatisticsProvider};
use crate::types::{Period, RankingMode};
use crate::utils::current_timestamp;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Serves ranked leaderboards from an injected provider and cache
pub struct LeaderboardService {
    provider: Arc<dyn StatisticsProvider>,
    cache: Arc<dyn StatsCache>,
    metrics: Arc<MetricsCollector>,
    ranking: RankingConfig,
}

impl LeaderboardService {
    pub fn new(
        provider: Arc<dyn StatisticsProvider>,
        cache: Arc<dyn StatsCache>,
        metrics: Arc<MetricsCollector>,
        ranking: RankingConfig,
    ) -> Self {
        Self {
            provider,
            cache,
            metrics,
            ranking,
        }
    }

    /// Ranking policy in effect for a mode
    pub fn policy(&self, mode: RankingMode) -> RankingPolicy {
        RankingPolicy::from_config(mode, &self.ranking)
    }

    pub fn provider(&self) -> Arc<dyn StatisticsProvider> {
        Arc::clone(&self.provider)
    }

    pub fn cache(&self) -> Arc<dyn StatsCache> {
        Arc::clone(&self.cache)
    }

    /// Build the board for `mode`, defaulting to the current period
    pub async fn leaderboard(&self, mode: RankingMode, period: Option<Period>) -> Result<Leaderboard> {
        let period = period.unwrap_or_else(|| Period::current(mode, current_timestamp()));
        period.ensure_mode(mode)?;

        let key = CacheKey::new(mode, period);
        let (stats, cached) = self.load_stats(key).await?;

        let timer = self.metrics.start_timer();
        let policy = self.policy(mode);
        let ranked = compute_ranks_with(to_records(&stats, mode), &policy);
        let rows = present(&ranked);
        let elapsed = timer.stop();

        self.metrics.record_board_served(mode, rows.len(), elapsed);
        debug!(
            "Ranked {} participants for {} in {:.3}ms (tie-break: {:?})",
            rows.len(),
            key,
            elapsed.as_secs_f64() * 1000.0,
            policy.tie_break
        );

        Ok(Leaderboard {
            mode,
            period,
            generated_at: current_timestamp(),
            cached,
            rows,
        })
    }

    /// Statistics for a key, from cache when fresh
    async fn load_stats(&self, key: CacheKey) -> Result<(StatsSnapshot, bool)> {
        if let Some(stats) = self.cache.get(&key)? {
            self.metrics.record_cache_lookup(key.mode, true);
            debug!("Cache hit for {}", key);
            return Ok((stats, true));
        }
        self.metrics.record_cache_lookup(key.mode, false);

        let stats = self.fetch_and_store(key).await?;
        Ok((stats, false))
    }

    /// Fetch from the provider and cache the result; failures are never cached
    async fn fetch_and_store(&self, key: CacheKey) -> Result<StatsSnapshot> {
        let timer = self.metrics.start_timer();
        let fetched = self.provider.fetch_stats(&key.period).await;
        let elapsed = timer.stop();
        self.metrics
            .record_provider_fetch(self.provider.name(), fetched.is_ok(), elapsed);

        let stats = match fetched {
            Ok(stats) => Arc::new(stats),
            Err(e) => {
                warn!(
                    "Provider '{}' failed for {}: {}",
                    self.provider.name(),
                    key,
                    e
                );
                // Keep domain errors intact, wrap everything else
                return Err(match e.downcast::<LeaderboardError>() {
                    Ok(domain) => domain.into(),
                    Err(other) => LeaderboardError::ProviderUnavailable {
                        message: other.to_string(),
                    }
                    .into(),
                });
            }
        };

        info!(
            "Fetched {} participants for {} from '{}' in {:.2}ms",
            stats.len(),
            key,
            self.provider.name(),
            elapsed.as_secs_f64() * 1000.0
        );

        // Concurrent misses may both land here; the later insert wins
        self.cache.insert(key, Arc::clone(&stats))?;
        self.metrics.record_cache_size(self.cache.len()?);
        Ok(stats)
    }

    /// Check the provider for the current yearly board
    ///
    /// A fresh cache entry answers without an upstream call, so periodic
    /// health checks cost at most one fetch per TTL window. Returns the
    /// participant count.
    pub async fn sample_provider(&self) -> Result<usize> {
        let key = CacheKey::new(
            RankingMode::Yearly,
            Period::current(RankingMode::Yearly, current_timestamp()),
        );

        if let Some(stats) = self.cache.get(&key)? {
            debug!("Provider sample answered from cache for {}", key);
            return Ok(stats.len());
        }

        Ok(self.fetch_and_store(key).await?.len())
    }

    /// Drop expired cache entries, returning how many were removed
    pub fn purge_expired(&self) -> Result<usize> {
        let purged = self.cache.purge_expired()?;
        let remaining = self.cache.len()?;
        self.metrics.record_cache_purge(purged, remaining);
        Ok(purged)
    }
}
