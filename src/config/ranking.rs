//! Ranking configuration

use serde::{Deserialize, Serialize};

/// Ranking rules that are a deployment choice rather than a fixed rule
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Break yearly point ties on completed achievement count
    pub yearly_secondary_tie_break: bool,
}
