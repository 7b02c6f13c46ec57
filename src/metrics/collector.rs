//! Metrics collection using Prometheus
//!
//! This module provides metrics for the fight-elo pipeline runs and the query
//! service using Prometheus metrics.

use crate::parser::ParseReport;
use anyhow::Result;
use prometheus::{
    Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, IntGaugeVec,
    Opts, Registry,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for fight-elo
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Service-level metrics
    service_metrics: ServiceMetrics,

    /// Compute pipeline metrics
    pipeline_metrics: PipelineMetrics,

    /// Query endpoint metrics
    query_metrics: QueryMetrics,
}

/// Service-level metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    /// Health check status (0=unhealthy, 1=degraded, 2=healthy)
    pub health_status: IntGauge,

    /// Component health status
    pub component_health: IntGaugeVec,
}

/// Compute pipeline metrics
#[derive(Clone)]
pub struct PipelineMetrics {
    /// Pipeline runs by outcome
    pub runs_total: IntCounterVec,

    /// Match records handed to the rating engine
    pub matches_processed_total: IntCounter,

    /// Rows dropped by the parser
    pub rows_dropped_total: IntCounter,

    /// Outcome tokens outside the vocabulary
    pub unrecognized_outcomes_total: IntCounter,

    /// Competitors on the last published leaderboard
    pub competitors_rated: IntGauge,

    /// Whole run duration
    pub run_duration_seconds: Histogram,

    /// Duration of each pipeline stage
    pub stage_duration_seconds: HistogramVec,
}

/// Query endpoint metrics
#[derive(Clone)]
pub struct QueryMetrics {
    /// Requests by endpoint and status code
    pub requests_total: IntCounterVec,

    /// Request handling time
    pub request_duration_seconds: HistogramVec,

    /// Failures to load a backing table
    pub table_load_failures_total: IntCounterVec,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let service_metrics = ServiceMetrics::new(&registry)?;
        let pipeline_metrics = PipelineMetrics::new(&registry)?;
        let query_metrics = QueryMetrics::new(&registry)?;

        Ok(Self {
            registry,
            service_metrics,
            pipeline_metrics,
            query_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Get service metrics
    pub fn service(&self) -> &ServiceMetrics {
        &self.service_metrics
    }

    /// Get pipeline metrics
    pub fn pipeline(&self) -> &PipelineMetrics {
        &self.pipeline_metrics
    }

    /// Get query metrics
    pub fn query(&self) -> &QueryMetrics {
        &self.query_metrics
    }

    /// Record what the parser produced
    pub fn record_parse(&self, report: &ParseReport) {
        self.pipeline_metrics
            .matches_processed_total
            .inc_by(report.records.len() as u64);
        self.pipeline_metrics
            .rows_dropped_total
            .inc_by(report.dropped.len() as u64);
        self.pipeline_metrics
            .unrecognized_outcomes_total
            .inc_by(report.unrecognized_outcomes as u64);
    }

    /// Record a pipeline stage duration
    pub fn record_stage(&self, stage: &str, duration: Duration) {
        self.pipeline_metrics
            .stage_duration_seconds
            .with_label_values(&[stage])
            .observe(duration.as_secs_f64());
    }

    /// Record the end of a pipeline run
    pub fn record_run(&self, success: bool, competitors: usize, duration: Duration) {
        let status = if success { "success" } else { "failed" };

        self.pipeline_metrics
            .runs_total
            .with_label_values(&[status])
            .inc();
        self.pipeline_metrics
            .run_duration_seconds
            .observe(duration.as_secs_f64());

        if success {
            self.pipeline_metrics
                .competitors_rated
                .set(competitors as i64);
        }
    }

    /// Record a handled query request
    pub fn record_request(&self, endpoint: &str, status: u16, duration: Duration) {
        let status = status.to_string();

        self.query_metrics
            .requests_total
            .with_label_values(&[endpoint, status.as_str()])
            .inc();
        self.query_metrics
            .request_duration_seconds
            .with_label_values(&[endpoint])
            .observe(duration.as_secs_f64());
    }

    /// Record a table that could not be loaded
    pub fn record_table_failure(&self, table: &str) {
        self.query_metrics
            .table_load_failures_total
            .with_label_values(&[table])
            .inc();
    }

    /// Update health status
    pub fn update_health_status(&self, status: u8) {
        self.service_metrics.health_status.set(status as i64);
    }

    /// Update component health
    pub fn update_component_health(&self, component: &str, healthy: bool) {
        let status = if healthy { 1 } else { 0 };
        self.service_metrics
            .component_health
            .with_label_values(&[component])
            .set(status);
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl ServiceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let health_status = IntGauge::new(
            "fight_elo_health_status",
            "Health status (0=unhealthy, 1=degraded, 2=healthy)",
        )?;
        registry.register(Box::new(health_status.clone()))?;

        let component_health = IntGaugeVec::new(
            Opts::new("fight_elo_component_health", "Component health status"),
            &["component"],
        )?;
        registry.register(Box::new(component_health.clone()))?;

        Ok(Self {
            health_status,
            component_health,
        })
    }
}

impl PipelineMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let runs_total = IntCounterVec::new(
            Opts::new("fight_elo_pipeline_runs_total", "Total pipeline runs"),
            &["status"],
        )?;
        registry.register(Box::new(runs_total.clone()))?;

        let matches_processed_total = IntCounter::new(
            "fight_elo_matches_processed_total",
            "Total match records rated",
        )?;
        registry.register(Box::new(matches_processed_total.clone()))?;

        let rows_dropped_total = IntCounter::new(
            "fight_elo_rows_dropped_total",
            "Total match log rows dropped by the parser",
        )?;
        registry.register(Box::new(rows_dropped_total.clone()))?;

        let unrecognized_outcomes_total = IntCounter::new(
            "fight_elo_unrecognized_outcomes_total",
            "Total outcome tokens outside the vocabulary",
        )?;
        registry.register(Box::new(unrecognized_outcomes_total.clone()))?;

        let competitors_rated = IntGauge::new(
            "fight_elo_competitors_rated",
            "Competitors on the last published leaderboard",
        )?;
        registry.register(Box::new(competitors_rated.clone()))?;

        let run_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "fight_elo_run_duration_seconds",
            "Pipeline run duration",
        ))?;
        registry.register(Box::new(run_duration_seconds.clone()))?;

        let stage_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "fight_elo_stage_duration_seconds",
                "Pipeline stage duration",
            ),
            &["stage"],
        )?;
        registry.register(Box::new(stage_duration_seconds.clone()))?;

        Ok(Self {
            runs_total,
            matches_processed_total,
            rows_dropped_total,
            unrecognized_outcomes_total,
            competitors_rated,
            run_duration_seconds,
            stage_duration_seconds,
        })
    }
}

impl QueryMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let requests_total = IntCounterVec::new(
            Opts::new("fight_elo_query_requests_total", "Total query requests"),
            &["endpoint", "status"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "fight_elo_query_duration_seconds",
                "Query request duration",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["endpoint"],
        )?;
        registry.register(Box::new(request_duration_seconds.clone()))?;

        let table_load_failures_total = IntCounterVec::new(
            Opts::new(
                "fight_elo_table_load_failures_total",
                "Total failures to load an exported table",
            ),
            &["table"],
        )?;
        registry.register(Box::new(table_load_failures_total.clone()))?;

        Ok(Self {
            requests_total,
            request_duration_seconds,
            table_load_failures_total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::DroppedRow;

    #[test]
    fn test_metrics_collector_creation() {
        let collector = MetricsCollector::new().unwrap();
        assert!(!collector.registry().gather().is_empty());
    }

    #[test]
    fn test_record_parse() {
        let collector = MetricsCollector::new().unwrap();
        let report = ParseReport {
            records: Vec::new(),
            dropped: vec![DroppedRow {
                row: 1,
                reason: "missing identity for competitor A".to_string(),
            }],
            unrecognized_outcomes: 2,
        };

        collector.record_parse(&report);
        assert_eq!(collector.pipeline().rows_dropped_total.get(), 1);
        assert_eq!(collector.pipeline().unrecognized_outcomes_total.get(), 2);
        assert_eq!(collector.pipeline().matches_processed_total.get(), 0);
    }

    #[test]
    fn test_record_run() {
        let collector = MetricsCollector::new().unwrap();
        collector.record_run(true, 42, Duration::from_millis(5));
        collector.record_run(false, 0, Duration::from_millis(1));

        assert_eq!(collector.pipeline().competitors_rated.get(), 42);
        assert_eq!(
            collector
                .pipeline()
                .runs_total
                .with_label_values(&["failed"])
                .get(),
            1
        );
    }

    #[test]
    fn test_record_request_and_failure() {
        let collector = MetricsCollector::new().unwrap();
        collector.record_request("ratings", 200, Duration::from_millis(2));
        collector.record_table_failure("stats");

        assert_eq!(
            collector
                .query()
                .requests_total
                .with_label_values(&["ratings", "200"])
                .get(),
            1
        );
        assert_eq!(
            collector
                .query()
                .table_load_failures_total
                .with_label_values(&["stats"])
                .get(),
            1
        );
    }

    #[test]
    fn test_timer() {
        let collector = MetricsCollector::new().unwrap();
        let timer = collector.start_timer();
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.stop() >= Duration::from_millis(5));
    }
}
