//! Rating calculator trait and implementations
//!
//! This module defines the interface for per-bout rating updates and a mock
//! implementation used to observe how the engine drives a calculator.

use crate::types::Outcome;
use serde::{Deserialize, Serialize};

/// Result of rating a single bout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingUpdate {
    /// Probability-like expectation that competitor A wins
    pub expected_a: f64,
    pub expected_b: f64,
    pub rating_a: f64,
    pub rating_b: f64,
    /// False when the outcome carried no score and ratings were left alone
    pub scored: bool,
}

/// Trait for calculating rating changes after a bout
pub trait RatingCalculator: Send + Sync {
    /// Calculate both competitors' ratings after a bout
    ///
    /// # Arguments
    /// * `rating_a` - competitor A's rating before the bout
    /// * `rating_b` - competitor B's rating before the bout
    /// * `outcome` - result from A's point of view
    fn rate(&self, rating_a: f64, rating_b: f64, outcome: Outcome) -> RatingUpdate;

    /// Get the initial rating for new competitors
    fn initial_rating(&self) -> f64;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;
}

/// Mock rating calculator for testing
///
/// Records every call and moves ratings by a fixed step: +step for the
/// winner, -step for the loser, nothing otherwise.
#[derive(Debug)]
pub struct MockRatingCalculator {
    calculation_calls: std::sync::Mutex<Vec<(f64, f64, Outcome)>>,
    step: f64,
    initial_rating: f64,
}

impl MockRatingCalculator {
    pub fn new(initial_rating: f64, step: f64) -> Self {
        Self {
            calculation_calls: std::sync::Mutex::new(Vec::new()),
            step,
            initial_rating,
        }
    }

    /// Get all calculation calls made (for testing)
    pub fn get_calculation_calls(&self) -> Vec<(f64, f64, Outcome)> {
        self.calculation_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Clear recorded calls
    pub fn clear_calls(&self) {
        if let Ok(mut calls) = self.calculation_calls.lock() {
            calls.clear();
        }
    }
}

impl Default for MockRatingCalculator {
    fn default() -> Self {
        Self::new(1000.0, 1.0)
    }
}

impl RatingCalculator for MockRatingCalculator {
    fn rate(&self, rating_a: f64, rating_b: f64, outcome: Outcome) -> RatingUpdate {
        if let Ok(mut calls) = self.calculation_calls.lock() {
            calls.push((rating_a, rating_b, outcome));
        }

        let (delta_a, scored) = match outcome {
            Outcome::AWins => (self.step, true),
            Outcome::BWins => (-self.step, true),
            Outcome::Draw => (0.0, true),
            Outcome::NoContest => (0.0, false),
        };

        RatingUpdate {
            expected_a: 0.5,
            expected_b: 0.5,
            rating_a: rating_a + delta_a,
            rating_b: rating_b - delta_a,
            scored,
        }
    }

    fn initial_rating(&self) -> f64 {
        self.initial_rating
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "mock",
            "initial_rating": self.initial_rating,
            "step": self.step
        })
    }
}
