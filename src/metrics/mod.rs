//! Metrics and monitoring for fight-elo
//!
//! Prometheus metrics for compute runs and query traffic. The registry is
//! exposed by the query server at `/metrics`.

pub mod collector;

pub use collector::{MetricsCollector, MetricsTimer, PipelineMetrics, QueryMetrics, ServiceMetrics};
