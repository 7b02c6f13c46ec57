//! Cumulative fight statistics
//!
//! Tallies results and event counters per competitor over the same ordered
//! match log the rating engine consumes. Aggregation never fails.

use crate::types::{MatchRecord, Outcome, StatsRecord};
use std::collections::HashMap;
use tracing::info;

/// Result column a bout adds to for one side
#[derive(Debug, Clone, Copy)]
enum Tally {
    Win,
    Loss,
    Draw,
    NoContest,
}

impl Tally {
    fn apply(self, stats: &mut StatsRecord) {
        match self {
            Tally::Win => stats.wins += 1,
            Tally::Loss => stats.losses += 1,
            Tally::Draw => stats.draws += 1,
            Tally::NoContest => stats.no_contests += 1,
        }
    }
}

/// Accumulates per-competitor statistics in first-appearance order
#[derive(Debug, Clone, Default)]
pub struct StatsAggregator {
    index: HashMap<String, usize>,
    records: Vec<StatsRecord>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, competitor: &str) -> &mut StatsRecord {
        let position = match self.index.get(competitor) {
            Some(&position) => position,
            None => {
                let position = self.records.len();
                self.index.insert(competitor.to_string(), position);
                self.records.push(StatsRecord::new(competitor));
                position
            }
        };
        &mut self.records[position]
    }

    /// Fold one bout into the running totals
    ///
    /// No-contests, including unrecognized outcomes, are tallied for both
    /// sides even though they leave ratings untouched.
    pub fn record(&mut self, record: &MatchRecord) {
        let (a_result, b_result) = match record.outcome {
            Outcome::AWins => (Tally::Win, Tally::Loss),
            Outcome::BWins => (Tally::Loss, Tally::Win),
            Outcome::Draw => (Tally::Draw, Tally::Draw),
            Outcome::NoContest => (Tally::NoContest, Tally::NoContest),
        };

        let sides = [
            (&record.competitor_a, &record.counters_a, a_result),
            (&record.competitor_b, &record.counters_b, b_result),
        ];
        for (competitor, counters, tally) in sides {
            let stats = self.entry(competitor);
            stats.fights += 1;
            tally.apply(stats);
            // Counters come straight from the log; clamp rather than overflow
            stats.knockdowns = stats.knockdowns.saturating_add(counters.knockdowns);
            stats.strikes_landed = stats.strikes_landed.saturating_add(counters.strikes_landed);
            stats.takedowns = stats.takedowns.saturating_add(counters.takedowns);
            stats.submission_attempts = stats
                .submission_attempts
                .saturating_add(counters.submission_attempts);
        }
    }

    pub fn get(&self, competitor: &str) -> Option<&StatsRecord> {
        self.index
            .get(competitor)
            .map(|&position| &self.records[position])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the aggregator, yielding rows in first-appearance order
    pub fn finish(self) -> Vec<StatsRecord> {
        self.records
    }

    /// Aggregate a whole match log
    pub fn run(records: &[MatchRecord]) -> Vec<StatsRecord> {
        let mut aggregator = Self::new();
        for record in records {
            aggregator.record(record);
        }

        info!(
            "Aggregated statistics for {} competitors over {} bouts",
            aggregator.len(),
            records.len()
        );
        aggregator.finish()
    }
}
