//! Match log layout: column names and the outcome vocabulary

use crate::error::FightEloError;
use crate::types::Outcome;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Header names of the columns the parser reads
///
/// Defaults follow the layout produced by the UFCStats scraper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub competitor_a: String,
    pub competitor_b: String,
    pub outcome: String,
    pub event: String,
    pub knockdowns_a: String,
    pub knockdowns_b: String,
    pub strikes_a: String,
    pub strikes_b: String,
    pub takedowns_a: String,
    pub takedowns_b: String,
    pub submissions_a: String,
    pub submissions_b: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            competitor_a: "fighter_1_name".to_string(),
            competitor_b: "fighter_2_name".to_string(),
            outcome: "fighter_1_result".to_string(),
            event: "event".to_string(),
            knockdowns_a: "fighter_1_knockdowns_number".to_string(),
            knockdowns_b: "fighter_2_knockdowns_number".to_string(),
            strikes_a: "fighter_1_number_strikes".to_string(),
            strikes_b: "fighter_2_number_strikes".to_string(),
            takedowns_a: "fighter_1_number_takedowns".to_string(),
            takedowns_b: "fighter_2_number_takedowns".to_string(),
            submissions_a: "fighter_1_number_submissions".to_string(),
            submissions_b: "fighter_2_number_submissions".to_string(),
        }
    }
}

impl ColumnMapping {
    /// Columns that must be present in the header
    pub fn required(&self) -> [&str; 3] {
        [
            self.competitor_a.as_str(),
            self.competitor_b.as_str(),
            self.outcome.as_str(),
        ]
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        let mut seen = HashSet::new();
        for column in self.required() {
            if column.trim().is_empty() {
                return Err(FightEloError::ConfigurationError {
                    message: "Required column names cannot be empty".to_string(),
                }
                .into());
            }
            if !seen.insert(column) {
                return Err(FightEloError::ConfigurationError {
                    message: format!("Column '{}' is mapped more than once", column),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Tokens of the outcome column, grouped by the outcome they stand for
///
/// Tokens are compared exactly. Anything not listed is a no-contest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeVocabulary {
    pub a_wins: Vec<String>,
    pub b_wins: Vec<String>,
    pub draw: Vec<String>,
    pub no_contest: Vec<String>,
}

impl Default for OutcomeVocabulary {
    fn default() -> Self {
        Self {
            a_wins: vec!["win".to_string()],
            b_wins: vec!["loss".to_string()],
            // The scraper concatenates both corners' markers: "drawdraw", "ncnc"
            draw: vec![
                "draw".to_string(),
                "drawdraw".to_string(),
                "ncnc".to_string(),
            ],
            no_contest: vec!["nc".to_string()],
        }
    }
}

impl OutcomeVocabulary {
    /// Look up a token; `None` means the token is not part of the vocabulary
    pub fn classify(&self, token: &str) -> Option<Outcome> {
        let contains = |tokens: &Vec<String>| tokens.iter().any(|t| t == token);

        if contains(&self.a_wins) {
            Some(Outcome::AWins)
        } else if contains(&self.b_wins) {
            Some(Outcome::BWins)
        } else if contains(&self.draw) {
            Some(Outcome::Draw)
        } else if contains(&self.no_contest) {
            Some(Outcome::NoContest)
        } else {
            None
        }
    }

    /// Every token must be non-empty and belong to exactly one outcome
    pub fn validate(&self) -> crate::error::Result<()> {
        let mut seen = HashSet::new();
        let all = self
            .a_wins
            .iter()
            .chain(&self.b_wins)
            .chain(&self.draw)
            .chain(&self.no_contest);

        for token in all {
            if token.is_empty() {
                return Err(FightEloError::ConfigurationError {
                    message: "Outcome tokens cannot be empty".to_string(),
                }
                .into());
            }
            if !seen.insert(token.as_str()) {
                return Err(FightEloError::ConfigurationError {
                    message: format!("Outcome token '{}' is listed more than once", token),
                }
                .into());
            }
        }

        if self.a_wins.is_empty() || self.b_wins.is_empty() {
            return Err(FightEloError::ConfigurationError {
                message: "Win and loss tokens are required".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
