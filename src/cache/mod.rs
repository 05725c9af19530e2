//! Explicit statistics cache injected into the request path

pub mod ttl;

pub use ttl::{CacheEntry, CacheKey, InMemoryStatsCache, StatsCache, StatsSnapshot};
