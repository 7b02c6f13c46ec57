//! Utility functions for the rating pipeline

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Placeholder tokens the upstream log uses for missing counters
const EMPTY_COUNTER_TOKENS: [&str; 4] = ["", "--", "nan", "None"];

/// Generate a new unique run ID
pub fn generate_run_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Round a rating to two decimal places
///
/// Rounds the exact binary value through its decimal rendering, ties to even.
pub fn round_to_cents(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Parse an event counter, coercing anything unusable to zero
pub fn parse_counter(raw: &str) -> u64 {
    let trimmed = raw.trim();
    if EMPTY_COUNTER_TOKENS.contains(&trimmed) {
        return 0;
    }
    trimmed.parse().unwrap_or(0)
}

/// Calculate the absolute difference between two ratings
pub fn rating_difference(rating1: f64, rating2: f64) -> f64 {
    (rating1 - rating2).abs()
}

/// Check if two ratings are within the given tolerance
pub fn ratings_within_tolerance(rating1: f64, rating2: f64, tolerance: f64) -> bool {
    rating_difference(rating1, rating2) <= tolerance
}
