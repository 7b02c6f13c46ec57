//! Per-competitor fight statistics
//!
//! Counts results and in-fight events over the match log, independently of
//! the rating pass.

pub mod aggregator;
pub mod metric;

pub use aggregator::StatsAggregator;
pub use metric::{rank_by, StatsMetric};
