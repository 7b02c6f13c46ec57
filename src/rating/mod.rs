//! Rating system using sequential Elo updates
//!
//! This module provides the per-bout calculator interface, the Elo
//! implementation backed by the skillratings crate, and the engine that folds
//! an ordered match log into final ratings and a leaderboard.

pub mod calculator;
pub mod elo;
pub mod engine;
pub mod leaderboard;
pub mod state;

// Re-export commonly used types
pub use calculator::{MockRatingCalculator, RatingCalculator, RatingUpdate};
pub use elo::{score_for_a, EloRatingCalculator};
pub use engine::{RatingEngine, RatingRun};
pub use leaderboard::{build_leaderboard, compare_entries, rank_of, sort_leaderboard};
pub use state::RatingState;
