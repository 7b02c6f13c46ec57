//! fight-elo - Elo ratings and fight statistics for combat sports
//!
//! This crate parses a chronological match log, folds it into sequential Elo
//! ratings and cumulative per-competitor statistics, publishes the derived
//! tables atomically, and serves them through a read-only HTTP API.

pub mod config;
pub mod error;
pub mod export;
pub mod metrics;
pub mod parser;
pub mod query;
pub mod rating;
pub mod service;
pub mod stats;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{FightEloError, Result};
pub use types::*;

// Re-export key components
pub use parser::{MatchLogParser, ParseReport};
pub use rating::{EloRatingCalculator, RatingCalculator, RatingEngine, RatingRun};
pub use service::{Pipeline, RunSummary};
pub use stats::StatsAggregator;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
