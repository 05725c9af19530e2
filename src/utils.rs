//! Utility functions for the leaderboard service

use chrono::{DateTime, Utc};

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Coerce an optional metric to a comparable number
///
/// Missing and NaN values become zero; negative zero is folded into zero
/// so it compares equal under a total order.
pub fn coerce_metric(value: Option<f64>) -> f64 {
    match value {
        Some(v) if !v.is_nan() => v + 0.0,
        _ => 0.0,
    }
}

/// Round to two decimal places (completion percentages)
pub fn round_to_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Completion percentage in 0..=100 with two-decimal precision
///
/// Upstream counts can report more completions than achievements (for
/// example after a set is revised); those cap at 100.
pub fn completion_percentage(completed: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to_two_decimals(completed as f64 / total as f64 * 100.0).min(100.0)
}
