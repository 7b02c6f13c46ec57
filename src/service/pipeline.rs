//! Batch compute pipeline
//!
//! Parses the match log, runs the rating and statistics passes concurrently
//! over a shared immutable slice, then stages and publishes every table
//! together. Any failure aborts the run before anything is published.

use crate::config::AppConfig;
use crate::error::{FightEloError, Result};
use crate::export::{
    LeaderboardRow, MatchRatingRow, PublishedTable, RunManifest, TableExporter, TableSummary,
    LEADERBOARD_TABLE, MANIFEST_TABLE, MATCH_RATINGS_TABLE, STATS_TABLE,
};
use crate::metrics::MetricsCollector;
use crate::parser::{MatchLogParser, ParseReport};
use crate::rating::{RatingCalculator, RatingEngine, RatingRun};
use crate::stats::StatsAggregator;
use crate::types::{MatchRecord, StatsRecord};
use crate::utils::{current_timestamp, generate_run_id};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub input: PathBuf,
    pub rows_read: usize,
    pub matches: usize,
    pub dropped_rows: usize,
    pub unrecognized_outcomes: usize,
    pub competitors: usize,
    /// Empty for dry runs
    pub tables: Vec<PublishedTable>,
    pub dry_run: bool,
    pub duration_ms: u64,
}

/// Everything derived from one match log, before export
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedTables {
    pub ratings: RatingRun,
    pub stats: Vec<StatsRecord>,
}

/// Orchestrates parse, compute and export
pub struct Pipeline {
    config: AppConfig,
    engine: RatingEngine,
    dry_run: bool,
    metrics: Option<Arc<MetricsCollector>>,
}

impl Pipeline {
    /// Create a pipeline from a validated configuration
    pub fn new(config: AppConfig) -> Result<Self> {
        crate::config::validate_config(&config)?;
        let engine = RatingEngine::elo(config.rating.clone())?;

        Ok(Self {
            config,
            engine,
            dry_run: false,
            metrics: None,
        })
    }

    /// Compute everything but publish nothing
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the whole pipeline against the configured input
    pub async fn run(&self) -> Result<RunSummary> {
        let started = Instant::now();
        let run_id = generate_run_id();
        info!(
            "Starting run {} on {}",
            run_id,
            self.config.input.path.display()
        );

        let result = self.execute(run_id, started).await;

        if let Some(metrics) = &self.metrics {
            let competitors = result.as_ref().map(|s| s.competitors).unwrap_or(0);
            metrics.record_run(result.is_ok(), competitors, started.elapsed());
        }

        match &result {
            Ok(summary) => info!(
                "Run {} finished in {}ms: {} matches, {} competitors, {} tables published",
                run_id,
                summary.duration_ms,
                summary.matches,
                summary.competitors,
                summary.tables.len()
            ),
            Err(e) => error!("Run {} failed: {:#}", run_id, e),
        }
        result
    }

    async fn execute(&self, run_id: Uuid, started: Instant) -> Result<RunSummary> {
        let stage = Instant::now();
        let parser = MatchLogParser::from_settings(&self.config.input);
        let input = self.config.input.path.clone();
        let report = {
            let input = input.clone();
            tokio::task::spawn_blocking(move || parser.parse_path(&input))
                .await
                .map_err(|e| FightEloError::InternalError {
                    message: format!("parse task failed: {}", e),
                })??
        };
        self.record_stage("parse", stage);
        if let Some(metrics) = &self.metrics {
            metrics.record_parse(&report);
        }

        let stage = Instant::now();
        let records: Arc<[MatchRecord]> = report.records.clone().into();
        let computed = self.compute(records).await?;
        self.record_stage("compute", stage);

        let tables = if self.dry_run {
            info!("Dry run: skipping export");
            Vec::new()
        } else {
            let stage = Instant::now();
            let tables = self.export(run_id, &report, &computed).await?;
            self.record_stage("export", stage);
            tables
        };

        Ok(RunSummary {
            run_id,
            input,
            rows_read: report.rows_read(),
            matches: report.records.len(),
            dropped_rows: report.dropped.len(),
            unrecognized_outcomes: report.unrecognized_outcomes,
            competitors: computed.ratings.leaderboard.len(),
            tables,
            dry_run: self.dry_run,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Run the rating and statistics passes concurrently
    pub async fn compute(&self, records: Arc<[MatchRecord]>) -> Result<ComputedTables> {
        let engine = self.engine.clone();
        let rating_records = records.clone();
        let rating_task = tokio::task::spawn_blocking(move || engine.run(&rating_records));
        let stats_task = tokio::task::spawn_blocking(move || StatsAggregator::run(&records));

        let (ratings, stats) = tokio::try_join!(rating_task, stats_task).map_err(|e| {
            FightEloError::InternalError {
                message: format!("compute task failed: {}", e),
            }
        })?;

        Ok(ComputedTables { ratings, stats })
    }

    /// Stage every table, publish them together, then publish the manifest
    pub async fn export(
        &self,
        run_id: Uuid,
        report: &ParseReport,
        computed: &ComputedTables,
    ) -> Result<Vec<PublishedTable>> {
        let output = self.config.output.clone();
        let leaderboard: Vec<LeaderboardRow> = computed
            .ratings
            .leaderboard
            .iter()
            .map(LeaderboardRow::from)
            .collect();
        let match_ratings: Vec<MatchRatingRow> = if output.write_match_ratings {
            computed
                .ratings
                .match_ratings
                .iter()
                .map(MatchRatingRow::from)
                .collect()
        } else {
            Vec::new()
        };
        let stats = computed.stats.clone();

        let mut manifest = RunManifest {
            run_id,
            generated_at: current_timestamp(),
            input: self.config.input.path.display().to_string(),
            rows_read: report.rows_read(),
            matches: report.records.len(),
            dropped_rows: report.dropped.len(),
            unrecognized_outcomes: report.unrecognized_outcomes,
            competitors: leaderboard.len(),
            rating: self.engine.calculator().config(),
            tables: Vec::new(),
        };

        tokio::task::spawn_blocking(move || -> Result<Vec<PublishedTable>> {
            let mut exporter = TableExporter::new(&output.dir)?;
            exporter.stage_csv(LEADERBOARD_TABLE, &output.leaderboard_file, leaderboard)?;
            exporter.stage_csv(STATS_TABLE, &output.stats_file, stats)?;
            if output.write_match_ratings {
                exporter.stage_csv(
                    MATCH_RATINGS_TABLE,
                    &output.match_ratings_file,
                    match_ratings,
                )?;
            } else {
                exporter.retire(MATCH_RATINGS_TABLE, &output.match_ratings_file);
            }
            let published = exporter.publish()?;

            manifest.tables = published.iter().map(TableSummary::from).collect();
            let mut exporter = TableExporter::new(&output.dir)?;
            exporter.stage_json(MANIFEST_TABLE, &output.manifest_file, &manifest)?;
            exporter.publish()?;

            Ok(published)
        })
        .await
        .map_err(|e| FightEloError::InternalError {
            message: format!("export task failed: {}", e),
        })?
    }

    fn record_stage(&self, stage: &str, started: Instant) {
        if let Some(metrics) = &self.metrics {
            metrics.record_stage(stage, started.elapsed());
        }
    }
}
