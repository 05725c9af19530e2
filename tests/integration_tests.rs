//! Integration tests for the retro-leaderboard service
//!
//! These tests drive the whole system through the HTTP router:
//! - Monthly and yearly boards with ties
//! - Statistics caching and TTL behaviour
//! - Request validation and provider failure mapping
//! - Concurrent request handling

mod fixtures;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use fixtures::{
    get_json, identifiers_of, january_2024, monthly_event, ranks_of, router_for, started_app,
    test_config, yearly_event, CountingProvider, FailingProvider, MockCache,
};
use retro_leaderboard::config::RankingConfig;
use retro_leaderboard::error::LeaderboardError;
use retro_leaderboard::metrics::MetricsCollector;
use retro_leaderboard::service::LeaderboardService;
use retro_leaderboard::types::{Period, RankingMode};
use retro_leaderboard::utils::current_timestamp;
use std::sync::Arc;
use tower::ServiceExt;

fn seeded_provider() -> CountingProvider {
    CountingProvider::new()
        .with_period(january_2024(), monthly_event())
        .with_period(Period::Year(2024), yearly_event())
}

#[tokio::test]
async fn test_monthly_board_shares_ranks() {
    let app = started_app(test_config(300), Arc::new(seeded_provider())).await;
    let router = router_for(app);

    let (status, board) = get_json(&router, "/leaderboard/monthly?period=2024-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["mode"], "monthly");
    assert_eq!(board["period"], "2024-01");
    assert_eq!(ranks_of(&board), vec![1, 1, 1, 4, 5, 5, 7]);
    assert_eq!(
        identifiers_of(&board),
        vec!["alpha", "bravo", "charlie", "delta", "pixel_pete", "echo", "lurker"]
    );

    let rows = board["rows"].as_array().unwrap();
    assert_eq!(rows[0]["rank_label"], "T1");
    assert_eq!(rows[2]["medal"], "gold");
    // Medals follow rank, so fourth place gets nothing
    assert!(rows[3].get("medal").is_none());
    assert_eq!(rows[3]["rank_label"], "4");
    assert_eq!(rows[4]["rank_label"], "T5");
    assert_eq!(rows[4]["primary_metric"], 50.0);
    assert_eq!(rows[6]["primary_metric"], 0.0);
}

#[tokio::test]
async fn test_yearly_board_ignores_secondary_by_default() {
    let app = started_app(test_config(300), Arc::new(seeded_provider())).await;
    let router = router_for(app);

    let (status, board) = get_json(&router, "/leaderboard/yearly?period=2024").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ranks_of(&board), vec![1, 2, 2, 4]);
    // Input order survives among tied participants
    assert_eq!(
        identifiers_of(&board),
        vec!["alpha", "bravo", "charlie", "delta"]
    );
}

#[tokio::test]
async fn test_yearly_tie_break_when_configured() {
    let mut config = test_config(300);
    config.ranking.yearly_secondary_tie_break = true;
    let app = started_app(config, Arc::new(seeded_provider())).await;
    let router = router_for(app);

    let (_, board) = get_json(&router, "/leaderboard/YEARLY?period=2024").await;

    assert_eq!(ranks_of(&board), vec![1, 2, 3, 4]);
    assert_eq!(
        identifiers_of(&board),
        vec!["alpha", "charlie", "bravo", "delta"]
    );
}

#[tokio::test]
async fn test_unknown_period_is_empty_board() {
    let app = started_app(test_config(300), Arc::new(seeded_provider())).await;
    let router = router_for(app);

    let (status, board) = get_json(&router, "/leaderboard/monthly?period=1999-12").await;

    assert_eq!(status, StatusCode::OK);
    assert!(board["rows"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_statistics_cached_within_ttl() {
    let provider = Arc::new(seeded_provider());
    let app = started_app(test_config(300), provider.clone()).await;
    let router = router_for(app);

    let (_, first) = get_json(&router, "/leaderboard/monthly?period=2024-01").await;
    let (_, second) = get_json(&router, "/leaderboard/monthly?period=2024-01").await;

    assert_eq!(provider.calls(), 1);
    assert_eq!(first["cached"], false);
    assert_eq!(second["cached"], true);
    assert_eq!(first["rows"], second["rows"]);

    // Different board, different cache key
    get_json(&router, "/leaderboard/yearly?period=2024").await;
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_zero_ttl_disables_cache() {
    let provider = Arc::new(seeded_provider());
    let app = started_app(test_config(0), provider.clone()).await;
    let router = router_for(app);

    for _ in 0..3 {
        let (status, board) = get_json(&router, "/leaderboard/monthly?period=2024-01").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(board["cached"], false);
    }

    assert_eq!(provider.calls(), 3);
}

#[tokio::test]
async fn test_invalid_requests_are_rejected() {
    let provider = Arc::new(seeded_provider());
    let app = started_app(test_config(300), provider.clone()).await;
    let router = router_for(app);

    for uri in [
        "/leaderboard/weekly",
        "/leaderboard/monthly?period=2024-13",
        "/leaderboard/monthly?period=last-month",
        "/leaderboard/yearly?period=2024-01",
        "/leaderboard/monthly?period=2024",
    ] {
        let (status, body) = get_json(&router, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {}", uri);
        assert!(body["error"].is_string(), "uri {}", uri);
    }

    // Validation happens before any upstream call
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_provider_failure_maps_to_service_unavailable() {
    let provider = Arc::new(FailingProvider::default());
    let app = started_app(test_config(300), provider.clone()).await;
    let router = router_for(app);

    let (status, body) = get_json(&router, "/leaderboard/yearly?period=2024").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("upstream stats API timed out"));

    // Failures are not cached
    get_json(&router, "/leaderboard/yearly?period=2024").await;
    assert_eq!(provider.calls(), 2);

    let (status, health) = get_json(&router, "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "degraded");
}

#[tokio::test]
async fn test_health_gauge_reports_degraded_provider() {
    let app = started_app(test_config(300), Arc::new(FailingProvider::default())).await;
    let router = router_for(app.clone());

    let (_, health) = get_json(&router, "/stats").await;

    assert_eq!(health["status"], "degraded");
    assert_eq!(app.metrics().service().health_status.get(), 1);
}

#[tokio::test]
async fn test_health_checks_reuse_cached_statistics() {
    let year = Period::current(RankingMode::Yearly, current_timestamp());
    let provider = Arc::new(CountingProvider::new().with_period(year, yearly_event()));
    let app = started_app(test_config(300), provider.clone()).await;
    let router = router_for(app.clone());

    for _ in 0..3 {
        let (_, health) = get_json(&router, "/stats").await;
        assert_eq!(health["status"], "healthy");
    }
    assert_eq!(provider.calls(), 1);
    assert_eq!(app.metrics().service().health_status.get(), 2);

    // The current yearly board is served from the same entry
    let (_, board) = get_json(&router, "/leaderboard/yearly").await;
    assert_eq!(board["cached"], true);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_concurrent_requests_agree() {
    let provider = Arc::new(seeded_provider().with_delay(25));
    let app = started_app(test_config(300), provider.clone()).await;
    let router = router_for(app);

    let requests = (0..8).map(|_| get_json(&router, "/leaderboard/monthly?period=2024-01"));
    let responses = futures::future::join_all(requests).await;

    for (status, board) in &responses {
        assert_eq!(*status, StatusCode::OK);
        assert_eq!(ranks_of(board), vec![1, 1, 1, 4, 5, 5, 7]);
    }

    // Concurrent misses may each fetch; never more than one per request
    let calls = provider.calls();
    assert!((1..=8).contains(&calls), "calls = {}", calls);

    get_json(&router, "/leaderboard/monthly?period=2024-01").await;
    assert_eq!(provider.calls(), calls);
}

#[tokio::test]
async fn test_metrics_reflect_traffic() {
    let app = started_app(test_config(300), Arc::new(seeded_provider())).await;
    let router = router_for(app);

    get_json(&router, "/leaderboard/monthly?period=2024-01").await;
    get_json(&router, "/leaderboard/monthly?period=2024-01").await;
    get_json(&router, "/leaderboard/weekly").await;

    let response = router
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(text.contains("retro_leaderboard_cache_hits_total{mode=\"monthly\"} 1"));
    assert!(text.contains("retro_leaderboard_cache_misses_total{mode=\"monthly\"} 1"));
    assert!(text.contains("retro_leaderboard_boards_served_total{mode=\"monthly\"} 2"));
    assert!(text.contains("status=\"400\""));
}

#[tokio::test]
async fn test_cache_entries_gauge_follows_inserts() {
    let app = started_app(test_config(300), Arc::new(seeded_provider())).await;
    let router = router_for(app.clone());

    get_json(&router, "/leaderboard/monthly?period=2024-01").await;
    assert_eq!(app.metrics().cache().entries.get(), 1);

    get_json(&router, "/leaderboard/yearly?period=2024").await;
    get_json(&router, "/leaderboard/yearly?period=2024").await;
    assert_eq!(app.metrics().cache().entries.get(), 2);
}

fn service_with_cache(
    provider: Arc<dyn retro_leaderboard::stats::StatisticsProvider>,
    cache: MockCache,
) -> LeaderboardService {
    LeaderboardService::new(
        provider,
        Arc::new(cache),
        Arc::new(MetricsCollector::new().unwrap()),
        RankingConfig::default(),
    )
}

#[tokio::test]
async fn test_cache_hit_skips_provider() {
    let provider = Arc::new(CountingProvider::new());
    let mut cache = MockCache::new();
    cache
        .expect_get()
        .times(1)
        .returning(|_| Ok(Some(Arc::new(monthly_event()))));
    cache.expect_insert().times(0);

    let service = service_with_cache(provider.clone(), cache);
    let board = service
        .leaderboard(RankingMode::Monthly, Some(january_2024()))
        .await
        .unwrap();

    assert!(board.cached);
    assert_eq!(board.rows.len(), 7);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_provider_failure_is_not_cached() {
    let mut cache = MockCache::new();
    cache.expect_get().times(1).returning(|_| Ok(None));
    cache.expect_insert().times(0);

    let service = service_with_cache(Arc::new(FailingProvider::default()), cache);
    let err = service
        .leaderboard(RankingMode::Yearly, Some(Period::Year(2024)))
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<LeaderboardError>(),
        Some(LeaderboardError::ProviderUnavailable { .. })
    ));
}

#[tokio::test]
async fn test_fetched_stats_are_inserted_under_board_key() {
    let mut cache = MockCache::new();
    cache.expect_get().times(1).returning(|_| Ok(None));
    cache
        .expect_insert()
        .withf(|key, value| {
            key.mode == RankingMode::Yearly && key.period == Period::Year(2024) && value.len() == 4
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let service = service_with_cache(Arc::new(seeded_provider()), cache);
    let board = service
        .leaderboard(RankingMode::Yearly, Some(Period::Year(2024)))
        .await
        .unwrap();

    assert!(!board.cached);
    assert_eq!(board.rows[0].identifier, "alpha");
}

#[tokio::test]
async fn test_cache_failure_propagates() {
    let mut cache = MockCache::new();
    cache
        .expect_get()
        .returning(|_| Err(anyhow::anyhow!("Failed to acquire cache lock")));

    let service = service_with_cache(Arc::new(seeded_provider()), cache);
    let result = service
        .leaderboard(RankingMode::Monthly, Some(january_2024()))
        .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("cache lock"));
}
