//! Statistics cache configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Time-to-live settings for cached provider statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long fetched statistics stay fresh; 0 disables caching
    pub ttl_seconds: u64,
    /// How often expired entries are purged in the background
    pub purge_interval_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 300,           // 5 minutes
            purge_interval_seconds: 60, // 1 minute
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge_interval_seconds)
    }
}
