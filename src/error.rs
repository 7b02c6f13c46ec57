//! Error types for the rating pipeline
//!
//! This module defines the domain errors raised by the parser, exporter and
//! query layer. Everything else flows through anyhow for consistent error
//! handling throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific pipeline scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FightEloError {
    #[error("Input log unavailable: {path}: {message}")]
    InputUnavailable { path: String, message: String },

    #[error("Input log is missing required column: {column}")]
    MissingColumn { column: String },

    #[error("Row {row} dropped: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("Export of {table} failed: {message}")]
    ExportFailed { table: String, message: String },

    #[error("Table {table} unavailable: {message}")]
    TableUnavailable { table: String, message: String },

    #[error("Competitor not found: {competitor}")]
    CompetitorNotFound { competitor: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal pipeline error: {message}")]
    InternalError { message: String },
}
