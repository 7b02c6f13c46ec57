//! Table export
//!
//! CSV layouts of the derived tables, the atomic stage-then-publish writer,
//! and the run manifest.

pub mod manifest;
pub mod rows;
pub mod table;

pub use manifest::{RunManifest, TableSummary};
pub use rows::{serialize_rating, LeaderboardRow, MatchRatingRow, TableRow};
pub use table::{read_csv_table, PublishedTable, TableExporter};

/// Table names used in logs, the manifest and health checks
pub const LEADERBOARD_TABLE: &str = "leaderboard";
pub const STATS_TABLE: &str = "stats";
pub const MATCH_RATINGS_TABLE: &str = "match_ratings";
pub const MANIFEST_TABLE: &str = "manifest";
