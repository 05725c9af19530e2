//! Test fixtures and fake collaborators for integration testing

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use mockall::mock;
use retro_leaderboard::cache::{CacheKey, InMemoryStatsCache, StatsCache, StatsSnapshot};
use retro_leaderboard::config::AppConfig;
use retro_leaderboard::error::Result;
use retro_leaderboard::server::create_router;
use retro_leaderboard::service::AppState;
use retro_leaderboard::stats::{ParticipantStats, StatisticsProvider};
use retro_leaderboard::types::Period;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

mock! {
    pub Cache {}

    impl StatsCache for Cache {
        fn get(&self, key: &CacheKey) -> Result<Option<StatsSnapshot>>;
        fn insert(&self, key: CacheKey, value: StatsSnapshot) -> Result<()>;
        fn invalidate(&self, key: &CacheKey) -> Result<bool>;
        fn purge_expired(&self) -> Result<usize>;
        fn len(&self) -> Result<usize>;
    }
}

/// Provider that serves fixed data and counts upstream calls
pub struct CountingProvider {
    stats: Mutex<HashMap<Period, Vec<ParticipantStats>>>,
    calls: AtomicUsize,
    delay_ms: u64,
}

impl CountingProvider {
    pub fn new() -> Self {
        Self {
            stats: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            delay_ms: 0,
        }
    }

    /// Simulate upstream latency so concurrent requests overlap
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_period(self, period: Period, stats: Vec<ParticipantStats>) -> Self {
        if let Ok(mut map) = self.stats.lock() {
            map.insert(period, stats);
        }
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for CountingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatisticsProvider for CountingProvider {
    async fn fetch_stats(&self, period: &Period) -> Result<Vec<ParticipantStats>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        let stats = self
            .stats
            .lock()
            .map_err(|_| anyhow::anyhow!("Failed to acquire stats lock"))?;
        Ok(stats.get(period).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Provider whose upstream is always down
#[derive(Debug, Default)]
pub struct FailingProvider {
    calls: AtomicUsize,
}

impl FailingProvider {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatisticsProvider for FailingProvider {
    async fn fetch_stats(&self, _period: &Period) -> Result<Vec<ParticipantStats>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow::anyhow!("upstream stats API timed out"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

pub fn january_2024() -> Period {
    Period::Month {
        year: 2024,
        month: 1,
    }
}

/// Monthly event with a three-way tie for first and a tie on fifth
pub fn monthly_event() -> Vec<ParticipantStats> {
    vec![
        ParticipantStats::monthly("pixel_pete", 20, 40),
        ParticipantStats::monthly("alpha", 40, 40),
        ParticipantStats::monthly("bravo", 40, 40),
        ParticipantStats::monthly("charlie", 40, 40),
        ParticipantStats::monthly("delta", 30, 40),
        ParticipantStats::monthly("echo", 20, 40),
        ParticipantStats {
            user: "lurker".to_string(),
            completed_achievements: None,
            total_achievements: None,
            points: None,
        },
    ]
}

/// Yearly points with a tie on second place
pub fn yearly_event() -> Vec<ParticipantStats> {
    vec![
        ParticipantStats::yearly("alpha", 310.0).with_completed(12),
        ParticipantStats::yearly("bravo", 250.0).with_completed(9),
        ParticipantStats::yearly("charlie", 250.0).with_completed(11),
        ParticipantStats::yearly("delta", 120.0).with_completed(3),
    ]
}

pub fn test_config(ttl_seconds: u64) -> AppConfig {
    let mut config = AppConfig::default();
    config.cache.ttl_seconds = ttl_seconds;
    config
}

/// Started application around the given provider with an in-memory cache
pub async fn started_app(
    config: AppConfig,
    provider: Arc<dyn StatisticsProvider>,
) -> Arc<AppState> {
    let cache = Arc::new(InMemoryStatsCache::new(config.cache.ttl()));
    let app = AppState::with_components(config, provider, cache).unwrap();
    app.start().await.unwrap();
    Arc::new(app)
}

pub fn router_for(app: Arc<AppState>) -> Router {
    create_router(app)
}

/// Issue a GET and decode the JSON body
pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Ranks column of a board response
pub fn ranks_of(board: &Value) -> Vec<u64> {
    board["rows"]
        .as_array()
        .map(|rows| rows.iter().filter_map(|r| r["rank"].as_u64()).collect())
        .unwrap_or_default()
}

pub fn identifiers_of(board: &Value) -> Vec<String> {
    board["rows"]
        .as_array()
        .map(|rows| {
            rows.iter()
                .filter_map(|r| r["identifier"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
