//! Time-to-live cache for provider statistics
//!
//! Entries are `{ value, expires_at }` keyed by board and period. Reads
//! treat an expired entry as absent; expired entries are dropped by
//! [`StatsCache::purge_expired`]. There is no other eviction. Two requests
//! that miss at the same time each fetch and the later insert wins.

use crate::error::{LeaderboardError, Result};
use crate::stats::models::ParticipantStats;
use crate::types::{Period, RankingMode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Key for a cached statistics snapshot
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheKey {
    pub mode: RankingMode,
    pub period: Period,
}

impl CacheKey {
    pub fn new(mode: RankingMode, period: Period) -> Self {
        Self { mode, period }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.mode, self.period)
    }
}

/// Shared snapshot of one period's statistics
pub type StatsSnapshot = Arc<Vec<ParticipantStats>>;

/// A cached value with its expiry
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: StatsSnapshot,
    pub inserted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Trait for statistics caches injected into the leaderboard service
pub trait StatsCache: Send + Sync {
    /// Fresh value for the key, if any
    fn get(&self, key: &CacheKey) -> Result<Option<StatsSnapshot>>;

    /// Store a value, replacing any previous entry
    fn insert(&self, key: CacheKey, value: StatsSnapshot) -> Result<()>;

    /// Drop an entry, returning whether one existed
    fn invalidate(&self, key: &CacheKey) -> Result<bool>;

    /// Drop all expired entries, returning how many were removed
    fn purge_expired(&self) -> Result<usize>;

    /// Number of stored entries, expired ones included
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// In-memory TTL cache
#[derive(Debug)]
pub struct InMemoryStatsCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl InMemoryStatsCache {
    /// Create a cache whose entries live for `ttl`; a zero TTL stores nothing
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store a value with an explicit expiry
    pub fn insert_with_expiry(
        &self,
        key: CacheKey,
        value: StatsSnapshot,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| LeaderboardError::InternalError {
                message: "Failed to acquire cache write lock".to_string(),
            })?;

        entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Utc::now(),
                expires_at,
            },
        );
        Ok(())
    }

    fn expiry_from_now(&self) -> DateTime<Utc> {
        // TTLs beyond chrono's range are capped at a century
        let ttl = chrono::Duration::from_std(self.ttl)
            .unwrap_or_else(|_| chrono::Duration::days(36_500));
        Utc::now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl StatsCache for InMemoryStatsCache {
    fn get(&self, key: &CacheKey) -> Result<Option<StatsSnapshot>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| LeaderboardError::InternalError {
                message: "Failed to acquire cache read lock".to_string(),
            })?;

        let now = Utc::now();
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| Arc::clone(&entry.value)))
    }

    fn insert(&self, key: CacheKey, value: StatsSnapshot) -> Result<()> {
        if self.ttl.is_zero() {
            return Ok(());
        }
        let expires_at = self.expiry_from_now();
        self.insert_with_expiry(key, value, expires_at)
    }

    fn invalidate(&self, key: &CacheKey) -> Result<bool> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| LeaderboardError::InternalError {
                message: "Failed to acquire cache write lock".to_string(),
            })?;

        Ok(entries.remove(key).is_some())
    }

    fn purge_expired(&self) -> Result<usize> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| LeaderboardError::InternalError {
                message: "Failed to acquire cache write lock".to_string(),
            })?;

        let now = Utc::now();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        Ok(before - entries.len())
    }

    fn len(&self) -> Result<usize> {
        let entries = self
            .entries
            .read()
            .map_err(|_| LeaderboardError::InternalError {
                message: "Failed to acquire cache read lock".to_string(),
            })?;

        Ok(entries.len())
    }
}
