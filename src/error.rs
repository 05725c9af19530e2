//! Error types for the leaderboard service
//!
//! Domain failures are described by [`LeaderboardError`]; everything is
//! carried through the crate as an `anyhow` result, as in the rest of the
//! service layer.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific leaderboard scenarios
#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("Invalid ranking mode: {mode}")]
    InvalidMode { mode: String },

    #[error("Invalid period: {period}")]
    InvalidPeriod { period: String },

    #[error("Period {period} cannot be used for a {mode} leaderboard")]
    PeriodModeMismatch { period: String, mode: String },

    #[error("Statistics provider unavailable: {message}")]
    ProviderUnavailable { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}

impl LeaderboardError {
    /// Whether the error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            LeaderboardError::InvalidMode { .. }
                | LeaderboardError::InvalidPeriod { .. }
                | LeaderboardError::PeriodModeMismatch { .. }
        )
    }
}
