//! Read-side views over the exported tables
//!
//! Pure query logic, independent of HTTP. Every call loads what it needs from
//! the [`TableSource`] and derives its answer from that snapshot.

use crate::config::OutcomeVocabulary;
use crate::error::FightEloError;
use crate::query::source::{TableResult, TableSource};
use crate::rating::rank_of;
use crate::stats::{rank_by, StatsMetric};
use crate::types::{CompetitorId, LeaderboardEntry, MatchRatingRecord, Outcome, StatsRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

/// Default half-width of the neighbors window
pub const DEFAULT_NEIGHBOR_RADIUS: usize = 50;

/// Default number of search suggestions
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Metrics a competitor profile reports a rank for
const PROFILE_RANK_METRICS: [StatsMetric; 4] = [
    StatsMetric::Wins,
    StatsMetric::StrikesLanded,
    StatsMetric::Takedowns,
    StatsMetric::Knockdowns,
];

/// A leaderboard row with its 1-based position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub competitor: CompetitorId,
    pub rating: f64,
}

/// Everything known about one competitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorProfile {
    pub competitor: CompetitorId,
    pub rating: Option<f64>,
    pub rank: Option<usize>,
    pub stats: Option<StatsRecord>,
    /// Rank among all competitors per statistics column
    pub stat_ranks: BTreeMap<String, usize>,
}

/// Result of a bout from one competitor's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoutResult {
    Win,
    Loss,
    Draw,
    NoContest,
}

impl BoutResult {
    fn for_side(outcome: Outcome, is_a: bool) -> Self {
        match (outcome, is_a) {
            (Outcome::AWins, true) | (Outcome::BWins, false) => BoutResult::Win,
            (Outcome::AWins, false) | (Outcome::BWins, true) => BoutResult::Loss,
            (Outcome::Draw, _) => BoutResult::Draw,
            (Outcome::NoContest, _) => BoutResult::NoContest,
        }
    }
}

/// One bout in a competitor's rating history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub sequence: usize,
    pub event: Option<String>,
    pub opponent: CompetitorId,
    pub result: BoutResult,
    /// Outcome token as recorded in the log
    pub outcome: String,
    pub rating_before: f64,
    pub rating_after: f64,
    pub opponent_rating_before: f64,
    pub opponent_rating_after: f64,
}

impl HistoryEntry {
    fn from_rated(rated: MatchRatingRecord, competitor: &str) -> Self {
        let record = rated.record;
        let is_a = record.competitor_a == competitor;
        let result = BoutResult::for_side(record.outcome, is_a);

        let (opponent, before, after, opponent_before, opponent_after) = if is_a {
            (
                record.competitor_b,
                rated.competitor_a_rating_before,
                rated.competitor_a_rating_after,
                rated.competitor_b_rating_before,
                rated.competitor_b_rating_after,
            )
        } else {
            (
                record.competitor_a,
                rated.competitor_b_rating_before,
                rated.competitor_b_rating_after,
                rated.competitor_a_rating_before,
                rated.competitor_a_rating_after,
            )
        };

        Self {
            sequence: record.sequence,
            event: record.event,
            opponent,
            result,
            outcome: record.outcome_token,
            rating_before: before,
            rating_after: after,
            opponent_rating_before: opponent_before,
            opponent_rating_after: opponent_after,
        }
    }
}

fn ranked(entries: Vec<LeaderboardEntry>) -> impl Iterator<Item = RankedEntry> {
    entries
        .into_iter()
        .enumerate()
        .map(|(position, entry)| RankedEntry {
            rank: position + 1,
            competitor: entry.competitor,
            rating: entry.rating,
        })
}

/// Leaderboard window around `position`
///
/// Normally `radius` rows on each side; near either end the window is shifted
/// so it still spans `2 * radius` rows.
pub fn neighbor_window(len: usize, position: usize, radius: usize) -> std::ops::Range<usize> {
    if len == 0 {
        return 0..0;
    }

    let span = radius.saturating_mul(2).max(1);
    let last = len - 1;
    let mut start = position.saturating_sub(radius);
    let reach = position.saturating_add(radius);
    let mut end = reach.min(last);

    if position < radius {
        end = (start + span - 1).min(last);
    }
    if reach > last {
        start = (end + 1).saturating_sub(span);
    }

    start..end + 1
}

/// Query facade over a table source
#[derive(Clone)]
pub struct QueryService {
    source: Arc<dyn TableSource>,
    vocabulary: OutcomeVocabulary,
}

impl QueryService {
    pub fn new(source: Arc<dyn TableSource>, vocabulary: OutcomeVocabulary) -> Self {
        Self { source, vocabulary }
    }

    pub fn source(&self) -> Arc<dyn TableSource> {
        self.source.clone()
    }

    /// Leaderboard with ranks, optionally truncated
    pub async fn ratings(&self, limit: Option<usize>) -> TableResult<Vec<RankedEntry>> {
        let leaderboard = self.source.leaderboard().await?;
        let limit = limit.unwrap_or(usize::MAX);
        Ok(ranked(leaderboard).take(limit).collect())
    }

    /// Stats rows, in table order or ranked by a metric
    pub async fn stats(
        &self,
        sort: Option<StatsMetric>,
        limit: Option<usize>,
    ) -> TableResult<Vec<StatsRecord>> {
        let mut rows = self.source.stats().await?;

        match sort {
            Some(metric) => Ok(rank_by(&rows, metric, limit)),
            None => {
                if let Some(limit) = limit {
                    rows.truncate(limit);
                }
                Ok(rows)
            }
        }
    }

    /// Resolve a requested name to the stored spelling
    ///
    /// Exact matches win; otherwise a case-insensitive match is accepted.
    fn resolve_name<'a>(names: impl Iterator<Item = &'a str> + Clone, requested: &str) -> Option<String> {
        names
            .clone()
            .find(|name| *name == requested)
            .or_else(|| names.clone().find(|name| name.eq_ignore_ascii_case(requested)))
            .map(str::to_string)
    }

    /// Rating, rank and statistics of one competitor
    pub async fn competitor(&self, name: &str) -> TableResult<CompetitorProfile> {
        let leaderboard = self.source.leaderboard().await?;
        let stats = self.source.stats().await?;

        let names = leaderboard
            .iter()
            .map(|entry| entry.competitor.as_str())
            .chain(stats.iter().map(|row| row.competitor.as_str()));
        let competitor = Self::resolve_name(names, name).ok_or_else(|| {
            FightEloError::CompetitorNotFound {
                competitor: name.to_string(),
            }
        })?;

        let rank = rank_of(&leaderboard, &competitor);
        let rating = rank.map(|rank| leaderboard[rank - 1].rating);
        let own_stats = stats.iter().find(|row| row.competitor == competitor).cloned();

        let mut stat_ranks = BTreeMap::new();
        if own_stats.is_some() {
            for metric in PROFILE_RANK_METRICS {
                let ordered = rank_by(&stats, metric, None);
                if let Some(position) = ordered.iter().position(|row| row.competitor == competitor) {
                    stat_ranks.insert(metric.to_string(), position + 1);
                }
            }
        }

        debug!("Resolved profile for {} (rank {:?})", competitor, rank);
        Ok(CompetitorProfile {
            competitor,
            rating,
            rank,
            stats: own_stats,
            stat_ranks,
        })
    }

    /// Leaderboard rows around a competitor
    pub async fn neighbors(&self, name: &str, radius: Option<usize>) -> TableResult<Vec<RankedEntry>> {
        let leaderboard = self.source.leaderboard().await?;
        let names = leaderboard.iter().map(|entry| entry.competitor.as_str());
        let competitor = Self::resolve_name(names, name).ok_or_else(|| {
            FightEloError::CompetitorNotFound {
                competitor: name.to_string(),
            }
        })?;

        let position = rank_of(&leaderboard, &competitor).map(|rank| rank - 1).unwrap_or(0);
        let window = neighbor_window(
            leaderboard.len(),
            position,
            radius.unwrap_or(DEFAULT_NEIGHBOR_RADIUS),
        );

        Ok(ranked(leaderboard)
            .skip(window.start)
            .take(window.len())
            .collect())
    }

    /// A competitor's rated bouts in source order
    pub async fn history(&self, name: &str) -> TableResult<Vec<HistoryEntry>> {
        let rows = self.source.match_ratings().await?;
        let names = rows
            .iter()
            .flat_map(|row| [row.competitor_a.as_str(), row.competitor_b.as_str()]);
        let competitor = Self::resolve_name(names, name).ok_or_else(|| {
            FightEloError::CompetitorNotFound {
                competitor: name.to_string(),
            }
        })?;

        Ok(rows
            .into_iter()
            .filter(|row| row.involves(&competitor))
            .map(|row| {
                let outcome = self
                    .vocabulary
                    .classify(&row.outcome)
                    .unwrap_or(Outcome::NoContest);
                HistoryEntry::from_rated(row.into_record(outcome), &competitor)
            })
            .collect())
    }

    /// Competitor names containing `query`, case-insensitively, in alphabetical order
    pub async fn search(&self, query: &str, limit: Option<usize>) -> TableResult<Vec<String>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let leaderboard = self.source.leaderboard().await?;
        let stats = self.source.stats().await?;

        let names: BTreeSet<String> = leaderboard
            .into_iter()
            .map(|entry| entry.competitor)
            .chain(stats.into_iter().map(|row| row.competitor))
            .collect();

        Ok(names
            .into_iter()
            .filter(|name| name.to_lowercase().contains(&query))
            .take(limit.unwrap_or(DEFAULT_SEARCH_LIMIT))
            .collect())
    }
}
