//! Participant statistics and the providers that supply them

pub mod models;
pub mod provider;

// Re-export commonly used types
pub use models::{to_records, ParticipantStats};
pub use provider::{SeedFile, SeedPeriod, StaticStatisticsProvider, StatisticsProvider};
