//! Rating system configuration

use serde::{Deserialize, Serialize};

/// Rating assigned to a competitor on first appearance
pub const DEFAULT_INITIAL_RATING: f64 = 1000.0;

/// Multiplier applied to (score - expected) on every scored bout
pub const DEFAULT_K_FACTOR: f64 = 40.0;

/// Elo parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    pub initial_rating: f64,
    pub k_factor: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            initial_rating: DEFAULT_INITIAL_RATING,
            k_factor: DEFAULT_K_FACTOR,
        }
    }
}

impl RatingConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.k_factor.is_finite() || self.k_factor <= 0.0 {
            return Err(crate::error::FightEloError::ConfigurationError {
                message: "K-factor must be positive".to_string(),
            }
            .into());
        }

        if !self.initial_rating.is_finite() {
            return Err(crate::error::FightEloError::ConfigurationError {
                message: "Initial rating must be a finite number".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RatingConfig::default();
        assert_eq!(config.initial_rating, 1000.0);
        assert_eq!(config.k_factor, 40.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_k() {
        let config = RatingConfig {
            k_factor: 0.0,
            ..RatingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_nan_initial_rating() {
        let config = RatingConfig {
            initial_rating: f64::NAN,
            ..RatingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
