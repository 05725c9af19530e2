//! Presentation of ranked records for the embedding dashboard

pub mod board;

pub use board::{present, rank_label, Leaderboard, LeaderboardRow, Medal};
