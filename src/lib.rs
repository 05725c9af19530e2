//! Retro Leaderboard - ranked community leaderboards for retro gaming
//!
//! This crate ranks per-participant achievement and point statistics into
//! tie-aware competition leaderboards and serves them over HTTP, with a
//! TTL cache in front of the statistics provider.

pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod presentation;
pub mod ranking;
pub mod server;
pub mod service;
pub mod stats;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use error::{LeaderboardError, Result};
pub use types::*;

pub use ranking::{compute_ranks, compute_ranks_with, RankingPolicy, TieBreak};
pub use service::{AppState, LeaderboardService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
