//! Elo rating system implementation
//!
//! This module provides the production rating calculator: the classic
//! logistic Elo update with a fixed K-factor, using the expectation from the
//! skillratings crate. Every new rating is rounded to two decimals and the
//! rounded value is what the next bout starts from.

use crate::config::RatingConfig;
use crate::rating::calculator::{RatingCalculator, RatingUpdate};
use crate::types::Outcome;
use crate::utils::round_to_cents;
use skillratings::elo::{expected_score, EloRating};

/// Score credited to competitor A, or `None` for bouts that are not scored
///
/// No-contests leave ratings untouched. The statistics aggregator applies a
/// different policy to the same outcome and still tallies them.
pub fn score_for_a(outcome: Outcome) -> Option<f64> {
    match outcome {
        Outcome::AWins => Some(1.0),
        Outcome::BWins => Some(0.0),
        Outcome::Draw => Some(0.5),
        Outcome::NoContest => None,
    }
}

/// Elo rating calculator implementation
#[derive(Debug, Clone)]
pub struct EloRatingCalculator {
    config: RatingConfig,
}

impl EloRatingCalculator {
    /// Create a new Elo rating calculator
    pub fn new(config: RatingConfig) -> crate::error::Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    pub fn k_factor(&self) -> f64 {
        self.config.k_factor
    }

    /// Expected scores of A and B; B's is taken as the complement of A's
    pub fn expected_scores(&self, rating_a: f64, rating_b: f64) -> (f64, f64) {
        let (expected_a, _) =
            expected_score(&EloRating { rating: rating_a }, &EloRating { rating: rating_b });
        (expected_a, 1.0 - expected_a)
    }
}

impl Default for EloRatingCalculator {
    fn default() -> Self {
        Self {
            config: RatingConfig::default(),
        }
    }
}

impl RatingCalculator for EloRatingCalculator {
    fn rate(&self, rating_a: f64, rating_b: f64, outcome: Outcome) -> RatingUpdate {
        let (expected_a, expected_b) = self.expected_scores(rating_a, rating_b);

        let Some(score_a) = score_for_a(outcome) else {
            return RatingUpdate {
                expected_a,
                expected_b,
                rating_a,
                rating_b,
                scored: false,
            };
        };

        let k = self.config.k_factor;
        let new_a = rating_a + k * (score_a - expected_a);
        let new_b = rating_b + k * ((1.0 - score_a) - (1.0 - expected_a));

        RatingUpdate {
            expected_a,
            expected_b,
            rating_a: round_to_cents(new_a),
            rating_b: round_to_cents(new_b),
            scored: true,
        }
    }

    fn initial_rating(&self) -> f64 {
        self.config.initial_rating
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "elo",
            "initial_rating": self.config.initial_rating,
            "k_factor": self.config.k_factor
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_mapping() {
        assert_eq!(score_for_a(Outcome::AWins), Some(1.0));
        assert_eq!(score_for_a(Outcome::BWins), Some(0.0));
        assert_eq!(score_for_a(Outcome::Draw), Some(0.5));
        assert_eq!(score_for_a(Outcome::NoContest), None);
    }

    #[test]
    fn test_equal_ratings_win() {
        let calculator = EloRatingCalculator::default();
        let update = calculator.rate(1000.0, 1000.0, Outcome::AWins);

        assert_eq!(update.expected_a, 0.5);
        assert_eq!(update.rating_a, 1020.0);
        assert_eq!(update.rating_b, 980.0);
        assert!(update.scored);
    }

    #[test]
    fn test_equal_ratings_loss() {
        let calculator = EloRatingCalculator::default();
        let update = calculator.rate(1000.0, 1000.0, Outcome::BWins);

        assert_eq!(update.rating_a, 980.0);
        assert_eq!(update.rating_b, 1020.0);
    }

    #[test]
    fn test_equal_ratings_draw_unchanged() {
        let calculator = EloRatingCalculator::default();
        let update = calculator.rate(1000.0, 1000.0, Outcome::Draw);

        assert_eq!(update.rating_a, 1000.0);
        assert_eq!(update.rating_b, 1000.0);
        assert!(update.scored);
    }

    #[test]
    fn test_no_contest_unchanged() {
        let calculator = EloRatingCalculator::default();
        let update = calculator.rate(1234.56, 987.65, Outcome::NoContest);

        assert_eq!(update.rating_a, 1234.56);
        assert_eq!(update.rating_b, 987.65);
        assert!(!update.scored);
    }

    #[test]
    fn test_underdog_win_is_rounded() {
        let calculator = EloRatingCalculator::default();
        // expected_a = 1 / (1 + 10^(40/400)) = 0.44269...
        let update = calculator.rate(980.0, 1020.0, Outcome::AWins);

        assert_eq!(update.rating_a, 1002.29);
        assert_eq!(update.rating_b, 997.71);
    }

    #[test]
    fn test_favourite_draw_loses_points() {
        let calculator = EloRatingCalculator::default();
        let update = calculator.rate(1020.0, 980.0, Outcome::Draw);

        assert!(update.rating_a < 1020.0);
        assert!(update.rating_b > 980.0);
        assert_eq!(update.rating_a, 1017.71);
        assert_eq!(update.rating_b, 982.29);
    }

    #[test]
    fn test_expected_scores_sum_to_one() {
        let calculator = EloRatingCalculator::default();
        for (a, b) in [(1000.0, 1000.0), (1500.0, 900.0), (812.34, 1299.99)] {
            let (expected_a, expected_b) = calculator.expected_scores(a, b);
            assert!((expected_a + expected_b - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_custom_k_factor() {
        let calculator = EloRatingCalculator::new(RatingConfig {
            initial_rating: 1500.0,
            k_factor: 20.0,
        })
        .unwrap();

        assert_eq!(calculator.initial_rating(), 1500.0);
        assert_eq!(calculator.k_factor(), 20.0);
        let update = calculator.rate(1500.0, 1500.0, Outcome::AWins);
        assert_eq!(update.rating_a, 1510.0);
        assert_eq!(update.rating_b, 1490.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = EloRatingCalculator::new(RatingConfig {
            initial_rating: 1000.0,
            k_factor: -1.0,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_config_json() {
        let calculator = EloRatingCalculator::default();
        let config = calculator.config();
        assert_eq!(config["type"], "elo");
        assert_eq!(config["k_factor"], 40.0);
        assert_eq!(config["initial_rating"], 1000.0);
    }
}
