//! Service layer for fight-elo
//!
//! This module contains the batch compute pipeline and the health checks the
//! query service reports.

pub mod health;
pub mod pipeline;

pub use health::{ComponentCheck, DataStats, HealthCheck, HealthStatus};
pub use pipeline::{ComputedTables, Pipeline, RunSummary};
