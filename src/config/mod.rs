//! Configuration management for fight-elo
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and default values for the rating pipeline.

pub mod app;
pub mod input;
pub mod rating;

// Re-export commonly used types
pub use app::{
    validate_config, AppConfig, InputSettings, OutputSettings, ServerSettings, ServiceSettings,
};
pub use input::{ColumnMapping, OutcomeVocabulary};
pub use rating::RatingConfig;
