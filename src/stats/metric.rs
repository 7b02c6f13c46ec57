//! Rankable statistics columns

use crate::error::FightEloError;
use crate::types::StatsRecord;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A single counter of [`StatsRecord`] that rows can be ranked by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatsMetric {
    Fights,
    Wins,
    Losses,
    Draws,
    NoContests,
    Knockdowns,
    StrikesLanded,
    Takedowns,
    SubmissionAttempts,
}

impl StatsMetric {
    pub const ALL: [StatsMetric; 9] = [
        StatsMetric::Fights,
        StatsMetric::Wins,
        StatsMetric::Losses,
        StatsMetric::Draws,
        StatsMetric::NoContests,
        StatsMetric::Knockdowns,
        StatsMetric::StrikesLanded,
        StatsMetric::Takedowns,
        StatsMetric::SubmissionAttempts,
    ];

    /// Column name as it appears in the exported stats table
    pub fn as_str(&self) -> &'static str {
        match self {
            StatsMetric::Fights => "fights",
            StatsMetric::Wins => "wins",
            StatsMetric::Losses => "losses",
            StatsMetric::Draws => "draws",
            StatsMetric::NoContests => "noContests",
            StatsMetric::Knockdowns => "knockdowns",
            StatsMetric::StrikesLanded => "strikesLanded",
            StatsMetric::Takedowns => "takedowns",
            StatsMetric::SubmissionAttempts => "submissionAttempts",
        }
    }

    pub fn value(&self, record: &StatsRecord) -> u64 {
        match self {
            StatsMetric::Fights => record.fights,
            StatsMetric::Wins => record.wins,
            StatsMetric::Losses => record.losses,
            StatsMetric::Draws => record.draws,
            StatsMetric::NoContests => record.no_contests,
            StatsMetric::Knockdowns => record.knockdowns,
            StatsMetric::StrikesLanded => record.strikes_landed,
            StatsMetric::Takedowns => record.takedowns,
            StatsMetric::SubmissionAttempts => record.submission_attempts,
        }
    }
}

impl std::fmt::Display for StatsMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatsMetric {
    type Err = FightEloError;

    /// Accepts the exported column name or its snake_case spelling
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('_', "").to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|metric| metric.as_str().to_ascii_lowercase() == wanted)
            .ok_or_else(|| FightEloError::ConfigurationError {
                message: format!("Unknown statistics metric '{}'", s),
            })
    }
}

/// Rows ordered by a metric descending, ties by competitor id, truncated to `limit`
pub fn rank_by(records: &[StatsRecord], metric: StatsMetric, limit: Option<usize>) -> Vec<StatsRecord> {
    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| {
        metric
            .value(b)
            .cmp(&metric.value(a))
            .then_with(|| a.competitor.cmp(&b.competitor))
    });

    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}
