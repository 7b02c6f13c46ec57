//! Sequential rating engine
//!
//! Folds the ordered match log through a [`RatingCalculator`]. Each step reads
//! both competitors' current ratings, applies one bout and yields the updated
//! table plus a per-bout record of before and after ratings.

use crate::rating::calculator::RatingCalculator;
use crate::rating::elo::EloRatingCalculator;
use crate::rating::leaderboard::build_leaderboard;
use crate::rating::state::RatingState;
use crate::types::{LeaderboardEntry, MatchRatingRecord, MatchRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Output of a full rating pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingRun {
    /// One entry per input record, in input order
    pub match_ratings: Vec<MatchRatingRecord>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Rating engine over a pluggable calculator
#[derive(Debug, Clone)]
pub struct RatingEngine<C: RatingCalculator = EloRatingCalculator> {
    calculator: C,
}

impl RatingEngine<EloRatingCalculator> {
    /// Engine with the default Elo calculator
    pub fn elo(config: crate::config::RatingConfig) -> crate::error::Result<Self> {
        Ok(Self::new(EloRatingCalculator::new(config)?))
    }
}

impl<C: RatingCalculator> RatingEngine<C> {
    pub fn new(calculator: C) -> Self {
        Self { calculator }
    }

    pub fn calculator(&self) -> &C {
        &self.calculator
    }

    /// Empty rating table seeded with the calculator's initial rating
    pub fn initial_state(&self) -> RatingState {
        RatingState::new(self.calculator.initial_rating())
    }

    /// Apply one bout to the table
    pub fn step(
        &self,
        mut state: RatingState,
        record: &MatchRecord,
    ) -> (RatingState, MatchRatingRecord) {
        let before_a = state.rating_or_init(&record.competitor_a);
        let before_b = state.rating_or_init(&record.competitor_b);

        let update = self.calculator.rate(before_a, before_b, record.outcome);
        let (after_a, after_b) = if update.scored {
            state.set(&record.competitor_a, update.rating_a);
            state.set(&record.competitor_b, update.rating_b);
            (update.rating_a, update.rating_b)
        } else {
            (before_a, before_b)
        };

        // Each side reports its own result, even when both sides name the same competitor
        let rated = MatchRatingRecord {
            record: record.clone(),
            competitor_a_rating_before: before_a,
            competitor_b_rating_before: before_b,
            competitor_a_rating_after: after_a,
            competitor_b_rating_after: after_b,
        };

        (state, rated)
    }

    /// Rate a whole match log in order
    pub fn run(&self, records: &[MatchRecord]) -> RatingRun {
        debug!(
            "Rating {} bouts with {}",
            records.len(),
            self.calculator.config()
        );

        let (state, match_ratings) = records.iter().fold(
            (self.initial_state(), Vec::with_capacity(records.len())),
            |(state, mut match_ratings), record| {
                let (state, rated) = self.step(state, record);
                match_ratings.push(rated);
                (state, match_ratings)
            },
        );

        let leaderboard = build_leaderboard(&state);
        info!(
            "Rated {} bouts across {} competitors",
            match_ratings.len(),
            leaderboard.len()
        );

        RatingRun {
            match_ratings,
            leaderboard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RatingConfig;
    use crate::rating::calculator::MockRatingCalculator;
    use crate::types::Outcome;

    fn bout(sequence: usize, a: &str, b: &str, outcome: Outcome) -> MatchRecord {
        MatchRecord::new(sequence, a, b, outcome)
    }

    fn engine() -> RatingEngine {
        RatingEngine::elo(RatingConfig::default()).unwrap()
    }

    #[test]
    fn test_single_win() {
        let run = engine().run(&[bout(0, "Alpha", "Bravo", Outcome::AWins)]);

        assert_eq!(run.match_ratings.len(), 1);
        let rated = &run.match_ratings[0];
        assert_eq!(rated.competitor_a_rating_before, 1000.0);
        assert_eq!(rated.competitor_b_rating_before, 1000.0);
        assert_eq!(rated.competitor_a_rating_after, 1020.0);
        assert_eq!(rated.competitor_b_rating_after, 980.0);

        assert_eq!(run.leaderboard[0].competitor, "Alpha");
        assert_eq!(run.leaderboard[0].rating, 1020.0);
        assert_eq!(run.leaderboard[1].rating, 980.0);
    }

    #[test]
    fn test_before_ratings_follow_previous_after() {
        let run = engine().run(&[
            bout(0, "Alpha", "Bravo", Outcome::AWins),
            bout(1, "Bravo", "Alpha", Outcome::AWins),
        ]);

        let second = &run.match_ratings[1];
        assert_eq!(second.competitor_a_rating_before, 980.0);
        assert_eq!(second.competitor_b_rating_before, 1020.0);
        assert_eq!(second.competitor_a_rating_after, 1002.29);
        assert_eq!(second.competitor_b_rating_after, 997.71);
    }

    #[test]
    fn test_no_contest_leaves_ratings() {
        let run = engine().run(&[
            bout(0, "Alpha", "Bravo", Outcome::AWins),
            bout(1, "Alpha", "Bravo", Outcome::NoContest),
        ]);

        let nc = &run.match_ratings[1];
        assert_eq!(nc.competitor_a_rating_before, nc.competitor_a_rating_after);
        assert_eq!(nc.competitor_b_rating_before, nc.competitor_b_rating_after);
        assert_eq!(run.leaderboard[0].rating, 1020.0);
    }

    #[test]
    fn test_no_contest_still_registers_newcomers() {
        let run = engine().run(&[bout(0, "Alpha", "Bravo", Outcome::NoContest)]);

        assert_eq!(run.leaderboard.len(), 2);
        assert!(run.leaderboard.iter().all(|entry| entry.rating == 1000.0));
        // Equal ratings fall back to id order
        assert_eq!(run.leaderboard[0].competitor, "Alpha");
    }

    #[test]
    fn test_empty_log() {
        let run = engine().run(&[]);
        assert!(run.match_ratings.is_empty());
        assert!(run.leaderboard.is_empty());
    }

    #[test]
    fn test_engine_feeds_calculator_current_ratings() {
        let engine = RatingEngine::new(MockRatingCalculator::new(1000.0, 10.0));
        engine.run(&[
            bout(0, "Alpha", "Bravo", Outcome::AWins),
            bout(1, "Charlie", "Alpha", Outcome::BWins),
            bout(2, "Bravo", "Charlie", Outcome::Draw),
        ]);

        let calls = engine.calculator().get_calculation_calls();
        assert_eq!(
            calls,
            vec![
                (1000.0, 1000.0, Outcome::AWins),
                (1000.0, 1010.0, Outcome::BWins),
                (990.0, 990.0, Outcome::Draw),
            ]
        );
    }

    #[test]
    fn test_step_matches_run() {
        let engine = engine();
        let records = vec![
            bout(0, "Alpha", "Bravo", Outcome::AWins),
            bout(1, "Bravo", "Charlie", Outcome::Draw),
        ];

        let state = engine.initial_state();
        let (state, first) = engine.step(state, &records[0]);
        let (state, second) = engine.step(state, &records[1]);

        let run = engine.run(&records);
        assert_eq!(run.match_ratings, vec![first, second]);
        assert_eq!(state.len(), 3);
    }

    #[test]
    fn test_output_preserves_input_order() {
        let records: Vec<_> = (0..5)
            .map(|i| bout(i, &format!("F{}", i), &format!("F{}", i + 1), Outcome::AWins))
            .collect();
        let run = engine().run(&records);

        let sequences: Vec<_> = run.match_ratings.iter().map(|r| r.record.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_self_bout_reports_both_sides() {
        let run = engine().run(&[bout(0, "Alpha", "Alpha", Outcome::AWins)]);

        let rated = &run.match_ratings[0];
        assert_eq!(rated.competitor_a_rating_after, 1020.0);
        assert_eq!(rated.competitor_b_rating_after, 980.0);
        // B is written last and becomes the stored rating
        assert_eq!(run.leaderboard.len(), 1);
        assert_eq!(run.leaderboard[0].rating, 980.0);
    }
}
