//! Common types used throughout the leaderboard service

use crate::error::LeaderboardError;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unique identifier for a participant within a period
pub type ParticipantId = String;

/// Which board is being ranked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingMode {
    /// Achievement completion percentage, ties broken by completed count
    Monthly,
    /// Accumulated points
    Yearly,
}

impl std::fmt::Display for RankingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingMode::Monthly => write!(f, "monthly"),
            RankingMode::Yearly => write!(f, "yearly"),
        }
    }
}

impl FromStr for RankingMode {
    type Err = LeaderboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(RankingMode::Monthly),
            "yearly" => Ok(RankingMode::Yearly),
            _ => Err(LeaderboardError::InvalidMode {
                mode: s.to_string(),
            }),
        }
    }
}

/// The month or year a leaderboard snapshot covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Period {
    Month { year: i32, month: u32 },
    Year(i32),
}

impl Period {
    /// Build a month period, rejecting months outside 1..=12
    pub fn month(year: i32, month: u32) -> Result<Self, LeaderboardError> {
        if !(1..=12).contains(&month) {
            return Err(LeaderboardError::InvalidPeriod {
                period: format!("{}-{}", year, month),
            });
        }
        Ok(Period::Month { year, month })
    }

    /// Current period for the given mode
    pub fn current(mode: RankingMode, now: DateTime<Utc>) -> Self {
        match mode {
            RankingMode::Monthly => Period::Month {
                year: now.year(),
                month: now.month(),
            },
            RankingMode::Yearly => Period::Year(now.year()),
        }
    }

    /// Whether this period can back a board of the given mode
    pub fn matches_mode(&self, mode: RankingMode) -> bool {
        matches!(
            (self, mode),
            (Period::Month { .. }, RankingMode::Monthly) | (Period::Year(_), RankingMode::Yearly)
        )
    }

    /// Check the period against a mode, producing the mismatch error
    pub fn ensure_mode(&self, mode: RankingMode) -> Result<(), LeaderboardError> {
        if self.matches_mode(mode) {
            Ok(())
        } else {
            Err(LeaderboardError::PeriodModeMismatch {
                period: self.to_string(),
                mode: mode.to_string(),
            })
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            Period::Year(year) => write!(f, "{:04}", year),
        }
    }
}

impl FromStr for Period {
    type Err = LeaderboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LeaderboardError::InvalidPeriod {
            period: s.to_string(),
        };
        let trimmed = s.trim();

        match trimmed.split_once('-') {
            Some((year, month)) => {
                let year: i32 = year.parse().map_err(|_| invalid())?;
                let month: u32 = month.parse().map_err(|_| invalid())?;
                Period::month(year, month).map_err(|_| invalid())
            }
            None => trimmed.parse().map(Period::Year).map_err(|_| invalid()),
        }
    }
}

impl TryFrom<String> for Period {
    type Error = LeaderboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

/// One participant's sort keys for a period, before ranking
///
/// Metrics are optional because upstream statistics are not always
/// complete. Missing values rank as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub identifier: ParticipantId,
    #[serde(default)]
    pub primary_metric: Option<f64>,
    #[serde(default)]
    pub secondary_metric: Option<f64>,
}

impl ParticipantRecord {
    pub fn new(identifier: impl Into<String>, primary: f64, secondary: f64) -> Self {
        Self {
            identifier: identifier.into(),
            primary_metric: Some(primary),
            secondary_metric: Some(secondary),
        }
    }

    /// Record with only a primary metric (yearly point totals)
    pub fn with_primary(identifier: impl Into<String>, primary: f64) -> Self {
        Self {
            identifier: identifier.into(),
            primary_metric: Some(primary),
            secondary_metric: None,
        }
    }
}

/// A participant record annotated with its competition rank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecord {
    pub identifier: ParticipantId,
    pub primary_metric: f64,
    pub secondary_metric: f64,
    /// 1-based competition rank
    pub rank: u32,
}
