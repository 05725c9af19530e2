//! Ranking policy: which keys a board sorts and ties on

use crate::config::RankingConfig;
use crate::types::RankingMode;
use serde::{Deserialize, Serialize};

/// Whether the secondary metric participates in ordering and tie detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// Equal primary metrics are separated by the secondary metric
    Secondary,
    /// Equal primary metrics always share a rank
    None,
}

/// Mode plus tie-break rule used by the rank calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingPolicy {
    pub mode: RankingMode,
    pub tie_break: TieBreak,
}

impl RankingPolicy {
    /// Default policy for a mode: monthly breaks ties, yearly does not
    pub fn for_mode(mode: RankingMode) -> Self {
        let tie_break = match mode {
            RankingMode::Monthly => TieBreak::Secondary,
            RankingMode::Yearly => TieBreak::None,
        };
        Self { mode, tie_break }
    }

    /// Policy for a mode with configured overrides applied
    pub fn from_config(mode: RankingMode, config: &RankingConfig) -> Self {
        let mut policy = Self::for_mode(mode);
        if mode == RankingMode::Yearly && config.yearly_secondary_tie_break {
            policy.tie_break = TieBreak::Secondary;
        }
        policy
    }

    pub fn uses_secondary(&self) -> bool {
        self.tie_break == TieBreak::Secondary
    }
}

impl From<RankingMode> for RankingPolicy {
    fn from(mode: RankingMode) -> Self {
        Self::for_mode(mode)
    }
}
