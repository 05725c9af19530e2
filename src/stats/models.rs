//! Raw participant statistics as returned by a statistics provider

use crate::types::{ParticipantRecord, RankingMode};
use crate::utils::completion_percentage;
use serde::{Deserialize, Serialize};

/// Per-participant statistics for one period
///
/// Fields are optional because upstream sources omit them freely; the
/// conversion to a [`ParticipantRecord`] treats anything missing as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantStats {
    pub user: String,
    #[serde(default)]
    pub completed_achievements: Option<u32>,
    #[serde(default)]
    pub total_achievements: Option<u32>,
    #[serde(default)]
    pub points: Option<f64>,
}

impl ParticipantStats {
    /// Monthly achievement progress
    pub fn monthly(user: impl Into<String>, completed: u32, total: u32) -> Self {
        Self {
            user: user.into(),
            completed_achievements: Some(completed),
            total_achievements: Some(total),
            points: None,
        }
    }

    /// Yearly point total
    pub fn yearly(user: impl Into<String>, points: f64) -> Self {
        Self {
            user: user.into(),
            completed_achievements: None,
            total_achievements: None,
            points: Some(points),
        }
    }

    pub fn with_completed(mut self, completed: u32) -> Self {
        self.completed_achievements = Some(completed);
        self
    }

    /// Completion percentage with two-decimal precision
    pub fn completion_percentage(&self) -> f64 {
        completion_percentage(
            self.completed_achievements.unwrap_or(0),
            self.total_achievements.unwrap_or(0),
        )
    }

    /// Sort keys for the given board
    ///
    /// Monthly boards rank completion percentage, then completed count.
    /// Yearly boards rank points; the completed count is carried as the
    /// secondary key and only used when the yearly tie-break is enabled.
    pub fn to_record(&self, mode: RankingMode) -> ParticipantRecord {
        let completed = self.completed_achievements.map(f64::from);
        match mode {
            RankingMode::Monthly => ParticipantRecord {
                identifier: self.user.clone(),
                primary_metric: Some(self.completion_percentage()),
                secondary_metric: completed,
            },
            RankingMode::Yearly => ParticipantRecord {
                identifier: self.user.clone(),
                primary_metric: self.points,
                secondary_metric: completed,
            },
        }
    }
}

/// Convert a whole period's statistics into ranking input
pub fn to_records(stats: &[ParticipantStats], mode: RankingMode) -> Vec<ParticipantRecord> {
    stats.iter().map(|s| s.to_record(mode)).collect()
}
