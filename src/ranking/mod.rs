//! Tie-aware competition ranking for leaderboards
//!
//! This module turns per-participant statistics into an ordered leaderboard,
//! parameterized by ranking mode and tie-break policy.

pub mod calculator;
pub mod policy;

// Re-export commonly used types
pub use calculator::{compute_ranks, compute_ranks_with};
pub use policy::{RankingPolicy, TieBreak};
