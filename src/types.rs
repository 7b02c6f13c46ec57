//! Common types used throughout the rating pipeline

use serde::{Deserialize, Serialize};

/// Identifier of a competitor as it appears in the match log
pub type CompetitorId = String;

/// Result of a bout from competitor A's point of view
///
/// Decided once by the parser. The rating engine and the statistics
/// aggregator each apply their own policy to these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    AWins,
    BWins,
    Draw,
    NoContest,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::AWins => write!(f, "a_wins"),
            Outcome::BWins => write!(f, "b_wins"),
            Outcome::Draw => write!(f, "draw"),
            Outcome::NoContest => write!(f, "no_contest"),
        }
    }
}

/// Per-side event counters recorded for a single bout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FightCounters {
    pub knockdowns: u64,
    pub strikes_landed: u64,
    pub takedowns: u64,
    pub submission_attempts: u64,
}

/// A single validated entry of the match log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Position of the row in the source log (0-based, data rows only)
    pub sequence: usize,
    pub competitor_a: CompetitorId,
    pub competitor_b: CompetitorId,
    pub outcome: Outcome,
    /// Outcome token exactly as it was read
    pub outcome_token: String,
    pub event: Option<String>,
    pub counters_a: FightCounters,
    pub counters_b: FightCounters,
}

impl MatchRecord {
    /// Build a record with zeroed counters and no event label
    pub fn new(
        sequence: usize,
        competitor_a: impl Into<CompetitorId>,
        competitor_b: impl Into<CompetitorId>,
        outcome: Outcome,
    ) -> Self {
        Self {
            sequence,
            competitor_a: competitor_a.into(),
            competitor_b: competitor_b.into(),
            outcome,
            outcome_token: outcome.to_string(),
            event: None,
            counters_a: FightCounters::default(),
            counters_b: FightCounters::default(),
        }
    }

    pub fn with_counters(mut self, counters_a: FightCounters, counters_b: FightCounters) -> Self {
        self.counters_a = counters_a;
        self.counters_b = counters_b;
        self
    }
}

/// A match record annotated with both competitors' ratings around the bout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRatingRecord {
    pub record: MatchRecord,
    pub competitor_a_rating_before: f64,
    pub competitor_b_rating_before: f64,
    pub competitor_a_rating_after: f64,
    pub competitor_b_rating_after: f64,
}

/// One row of the final ranking table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub competitor: CompetitorId,
    pub rating: f64,
}

/// Cumulative fight statistics for one competitor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    pub competitor: CompetitorId,
    pub fights: u64,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    pub no_contests: u64,
    pub knockdowns: u64,
    pub strikes_landed: u64,
    pub takedowns: u64,
    pub submission_attempts: u64,
}

impl StatsRecord {
    /// Zeroed statistics for a competitor seen for the first time
    pub fn new(competitor: impl Into<CompetitorId>) -> Self {
        Self {
            competitor: competitor.into(),
            ..Self::default()
        }
    }
}
