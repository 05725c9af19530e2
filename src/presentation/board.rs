//! Display rows for a ranked leaderboard
//!
//! Medals follow the rank value, not the array position: when three
//! participants tie for first, all three get gold and nobody gets silver
//! or bronze.

use crate::types::{Period, RankedRecord, RankingMode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Podium decoration for ranks 1 to 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_rank(rank: u32) -> Option<Self> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }
}

/// One rendered leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    /// 1-based array position
    pub position: usize,
    pub rank: u32,
    /// Rank text, prefixed with `T` when the rank is shared
    pub rank_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medal: Option<Medal>,
    pub identifier: String,
    pub primary_metric: f64,
    pub secondary_metric: f64,
}

/// A complete board as served to the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaderboard {
    pub mode: RankingMode,
    pub period: Period,
    pub generated_at: DateTime<Utc>,
    /// Whether the statistics came from the cache
    pub cached: bool,
    pub rows: Vec<LeaderboardRow>,
}

/// Tie-aware label for a rank
pub fn rank_label(rank: u32, shared: bool) -> String {
    if shared {
        format!("T{}", rank)
    } else {
        rank.to_string()
    }
}

/// Turn ranked records (in sorted order) into display rows
pub fn present(ranked: &[RankedRecord]) -> Vec<LeaderboardRow> {
    ranked
        .iter()
        .enumerate()
        .map(|(index, record)| {
            // Ties are contiguous in sorted order, so a neighbour check suffices
            let shared = (index > 0 && ranked[index - 1].rank == record.rank)
                || ranked
                    .get(index + 1)
                    .is_some_and(|next| next.rank == record.rank);

            LeaderboardRow {
                position: index + 1,
                rank: record.rank,
                rank_label: rank_label(record.rank, shared),
                medal: Medal::for_rank(record.rank),
                identifier: record.identifier.clone(),
                primary_metric: record.primary_metric,
                secondary_metric: record.secondary_metric,
            }
        })
        .collect()
}
