//! Row layouts of the exported tables
//!
//! Each row type fixes the column order of one CSV table. Ratings are written
//! with exactly two decimals and read back as plain floats.

use crate::types::{
    FightCounters, LeaderboardEntry, MatchRatingRecord, MatchRecord, Outcome, StatsRecord,
};
use serde::{Deserialize, Serialize, Serializer};

/// A serializable row with a fixed header
pub trait TableRow: Serialize {
    const HEADERS: &'static [&'static str];
}

/// Write a rating with two decimals
pub fn serialize_rating<S: Serializer>(rating: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:.2}", rating))
}

/// `competitor,rating`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub competitor: String,
    #[serde(serialize_with = "serialize_rating")]
    pub rating: f64,
}

impl TableRow for LeaderboardRow {
    const HEADERS: &'static [&'static str] = &["competitor", "rating"];
}

impl From<&LeaderboardEntry> for LeaderboardRow {
    fn from(entry: &LeaderboardEntry) -> Self {
        Self {
            competitor: entry.competitor.clone(),
            rating: entry.rating,
        }
    }
}

impl From<LeaderboardRow> for LeaderboardEntry {
    fn from(row: LeaderboardRow) -> Self {
        Self {
            competitor: row.competitor,
            rating: row.rating,
        }
    }
}

impl TableRow for StatsRecord {
    const HEADERS: &'static [&'static str] = &[
        "competitor",
        "fights",
        "wins",
        "losses",
        "draws",
        "noContests",
        "knockdowns",
        "strikesLanded",
        "takedowns",
        "submissionAttempts",
    ];
}

/// One rated bout, flattened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRatingRow {
    pub sequence: usize,
    pub event: Option<String>,
    #[serde(rename = "competitorA")]
    pub competitor_a: String,
    #[serde(rename = "competitorB")]
    pub competitor_b: String,
    /// Outcome token as it appeared in the log
    pub outcome: String,
    #[serde(rename = "competitorA_knockdowns")]
    pub competitor_a_knockdowns: u64,
    #[serde(rename = "competitorB_knockdowns")]
    pub competitor_b_knockdowns: u64,
    #[serde(rename = "competitorA_strikesLanded")]
    pub competitor_a_strikes_landed: u64,
    #[serde(rename = "competitorB_strikesLanded")]
    pub competitor_b_strikes_landed: u64,
    #[serde(rename = "competitorA_takedowns")]
    pub competitor_a_takedowns: u64,
    #[serde(rename = "competitorB_takedowns")]
    pub competitor_b_takedowns: u64,
    #[serde(rename = "competitorA_submissionAttempts")]
    pub competitor_a_submission_attempts: u64,
    #[serde(rename = "competitorB_submissionAttempts")]
    pub competitor_b_submission_attempts: u64,
    #[serde(rename = "competitorA_ratingBefore", serialize_with = "serialize_rating")]
    pub competitor_a_rating_before: f64,
    #[serde(rename = "competitorB_ratingBefore", serialize_with = "serialize_rating")]
    pub competitor_b_rating_before: f64,
    #[serde(rename = "competitorA_ratingAfter", serialize_with = "serialize_rating")]
    pub competitor_a_rating_after: f64,
    #[serde(rename = "competitorB_ratingAfter", serialize_with = "serialize_rating")]
    pub competitor_b_rating_after: f64,
}

impl TableRow for MatchRatingRow {
    const HEADERS: &'static [&'static str] = &[
        "sequence",
        "event",
        "competitorA",
        "competitorB",
        "outcome",
        "competitorA_knockdowns",
        "competitorB_knockdowns",
        "competitorA_strikesLanded",
        "competitorB_strikesLanded",
        "competitorA_takedowns",
        "competitorB_takedowns",
        "competitorA_submissionAttempts",
        "competitorB_submissionAttempts",
        "competitorA_ratingBefore",
        "competitorB_ratingBefore",
        "competitorA_ratingAfter",
        "competitorB_ratingAfter",
    ];
}

impl MatchRatingRow {
    /// Whether the competitor fought in this bout
    pub fn involves(&self, competitor: &str) -> bool {
        self.competitor_a == competitor || self.competitor_b == competitor
    }
}

impl From<&MatchRatingRecord> for MatchRatingRow {
    fn from(rated: &MatchRatingRecord) -> Self {
        let record = &rated.record;
        Self {
            sequence: record.sequence,
            event: record.event.clone(),
            competitor_a: record.competitor_a.clone(),
            competitor_b: record.competitor_b.clone(),
            outcome: record.outcome_token.clone(),
            competitor_a_knockdowns: record.counters_a.knockdowns,
            competitor_b_knockdowns: record.counters_b.knockdowns,
            competitor_a_strikes_landed: record.counters_a.strikes_landed,
            competitor_b_strikes_landed: record.counters_b.strikes_landed,
            competitor_a_takedowns: record.counters_a.takedowns,
            competitor_b_takedowns: record.counters_b.takedowns,
            competitor_a_submission_attempts: record.counters_a.submission_attempts,
            competitor_b_submission_attempts: record.counters_b.submission_attempts,
            competitor_a_rating_before: rated.competitor_a_rating_before,
            competitor_b_rating_before: rated.competitor_b_rating_before,
            competitor_a_rating_after: rated.competitor_a_rating_after,
            competitor_b_rating_after: rated.competitor_b_rating_after,
        }
    }
}

impl MatchRatingRow {
    /// Rebuild the rated bout; the outcome is reclassified by the caller's vocabulary
    pub fn into_record(self, outcome: Outcome) -> MatchRatingRecord {
        let record = MatchRecord {
            sequence: self.sequence,
            competitor_a: self.competitor_a,
            competitor_b: self.competitor_b,
            outcome,
            outcome_token: self.outcome,
            event: self.event,
            counters_a: FightCounters {
                knockdowns: self.competitor_a_knockdowns,
                strikes_landed: self.competitor_a_strikes_landed,
                takedowns: self.competitor_a_takedowns,
                submission_attempts: self.competitor_a_submission_attempts,
            },
            counters_b: FightCounters {
                knockdowns: self.competitor_b_knockdowns,
                strikes_landed: self.competitor_b_strikes_landed,
                takedowns: self.competitor_b_takedowns,
                submission_attempts: self.competitor_b_submission_attempts,
            },
        };

        MatchRatingRecord {
            record,
            competitor_a_rating_before: self.competitor_a_rating_before,
            competitor_b_rating_before: self.competitor_b_rating_before,
            competitor_a_rating_after: self.competitor_a_rating_after,
            competitor_b_rating_after: self.competitor_b_rating_after,
        }
    }
}
