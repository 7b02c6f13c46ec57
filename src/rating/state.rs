//! Running rating table
//!
//! Holds every competitor's current rating while the match log is folded.
//! Competitors enter at the initial rating on first appearance and keep the
//! order in which they first appeared.

use crate::types::CompetitorId;
use std::collections::HashMap;

/// Current ratings keyed by competitor, in first-appearance order
#[derive(Debug, Clone, PartialEq)]
pub struct RatingState {
    initial_rating: f64,
    index: HashMap<CompetitorId, usize>,
    ratings: Vec<(CompetitorId, f64)>,
}

impl RatingState {
    /// Create an empty table that seeds newcomers with `initial_rating`
    pub fn new(initial_rating: f64) -> Self {
        Self {
            initial_rating,
            index: HashMap::new(),
            ratings: Vec::new(),
        }
    }

    pub fn initial_rating(&self) -> f64 {
        self.initial_rating
    }

    /// Current rating, registering the competitor at the initial rating if unseen
    pub fn rating_or_init(&mut self, competitor: &str) -> f64 {
        if let Some(&position) = self.index.get(competitor) {
            return self.ratings[position].1;
        }

        let position = self.ratings.len();
        self.index.insert(competitor.to_string(), position);
        self.ratings
            .push((competitor.to_string(), self.initial_rating));
        self.initial_rating
    }

    /// Current rating of a known competitor
    pub fn get(&self, competitor: &str) -> Option<f64> {
        self.index
            .get(competitor)
            .map(|&position| self.ratings[position].1)
    }

    /// Overwrite a rating after a bout; unknown competitors are registered first
    pub(crate) fn set(&mut self, competitor: &str, rating: f64) {
        match self.index.get(competitor) {
            Some(&position) => self.ratings[position].1 = rating,
            None => {
                self.index
                    .insert(competitor.to_string(), self.ratings.len());
                self.ratings.push((competitor.to_string(), rating));
            }
        }
    }

    pub fn contains(&self, competitor: &str) -> bool {
        self.index.contains_key(competitor)
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Iterate ratings in first-appearance order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.ratings
            .iter()
            .map(|(competitor, rating)| (competitor.as_str(), *rating))
    }
}
