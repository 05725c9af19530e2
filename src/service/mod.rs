//! Service layer for the retro-leaderboard service
//!
//! This module contains the leaderboard request path, the main application
//! state and background task management.

pub mod app;
pub mod health;
pub mod leaderboard;

pub use app::{AppState, ServiceError};
pub use health::{HealthCheck, HealthStatus};
pub use leaderboard::LeaderboardService;
