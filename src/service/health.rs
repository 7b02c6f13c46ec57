//! Health checks over the published tables
//!
//! The query service is healthy when every table it serves can be loaded.
//! A missing leaderboard or stats table makes it unhealthy; a missing
//! match-ratings table or manifest only degrades it.

use crate::export::{LEADERBOARD_TABLE, MANIFEST_TABLE, MATCH_RATINGS_TABLE, STATS_TABLE};
use crate::query::{TableResult, TableSource};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

/// Health check status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Unhealthy,
    Degraded,
    Healthy,
}

impl HealthStatus {
    /// Gauge value exported to Prometheus
    pub fn as_gauge(&self) -> u8 {
        match self {
            HealthStatus::Unhealthy => 0,
            HealthStatus::Degraded => 1,
            HealthStatus::Healthy => 2,
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "✅ healthy"),
            HealthStatus::Degraded => write!(f, "⚠️  degraded"),
            HealthStatus::Unhealthy => write!(f, "❌ unhealthy"),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Overall service status
    pub status: HealthStatus,
    /// Service name
    pub service: String,
    pub version: String,
    /// Current timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Detailed component checks
    pub checks: Vec<ComponentCheck>,
    /// What the published data covers
    pub stats: DataStats,
}

/// Individual component health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCheck {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Row count or error message
    pub message: Option<String>,
    /// Check duration in milliseconds
    pub duration_ms: u64,
}

/// Summary of the published data for health reporting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataStats {
    pub competitors: Option<usize>,
    pub stats_rows: Option<usize>,
    pub matches: Option<usize>,
    pub run_id: Option<Uuid>,
    pub generated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl HealthCheck {
    /// Check every table the query service depends on
    pub async fn check(source: &dyn TableSource, service: &str) -> Self {
        let mut checks = Vec::new();
        let mut stats = DataStats::default();

        let start = Instant::now();
        let leaderboard = source.leaderboard().await.map(|rows| rows.len());
        stats.competitors = leaderboard.as_ref().ok().copied();
        checks.push(Self::table_check(
            LEADERBOARD_TABLE,
            &leaderboard,
            HealthStatus::Unhealthy,
            start,
        ));

        let start = Instant::now();
        let stats_rows = source.stats().await.map(|rows| rows.len());
        stats.stats_rows = stats_rows.as_ref().ok().copied();
        checks.push(Self::table_check(
            STATS_TABLE,
            &stats_rows,
            HealthStatus::Unhealthy,
            start,
        ));

        let start = Instant::now();
        let matches = source.match_ratings().await.map(|rows| rows.len());
        stats.matches = matches.as_ref().ok().copied();
        checks.push(Self::table_check(
            MATCH_RATINGS_TABLE,
            &matches,
            HealthStatus::Degraded,
            start,
        ));

        let start = Instant::now();
        let manifest = source.manifest().await;
        if let Ok(manifest) = &manifest {
            stats.run_id = Some(manifest.run_id);
            stats.generated_at = Some(manifest.generated_at);
        }
        let manifest = manifest.map(|manifest| manifest.tables.len());
        checks.push(Self::table_check(
            MANIFEST_TABLE,
            &manifest,
            HealthStatus::Degraded,
            start,
        ));

        let status = checks
            .iter()
            .map(|check| check.status)
            .min()
            .unwrap_or(HealthStatus::Healthy);
        debug!("Health check finished: {:?}", status);

        HealthCheck {
            status,
            service: service.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now(),
            checks,
            stats,
        }
    }

    /// Readiness check - verify the core tables can be served
    pub async fn readiness_check(source: &dyn TableSource) -> HealthStatus {
        let leaderboard = source.leaderboard().await;
        let stats = source.stats().await;

        match (leaderboard, stats) {
            (Ok(_), Ok(_)) => HealthStatus::Healthy,
            (Err(e), _) | (_, Err(e)) => {
                warn!("Readiness check failed: {}", e);
                HealthStatus::Unhealthy
            }
        }
    }

    fn table_check(
        name: &str,
        result: &TableResult<usize>,
        failure: HealthStatus,
        start: Instant,
    ) -> ComponentCheck {
        let (status, message) = match result {
            Ok(rows) => (HealthStatus::Healthy, Some(format!("{} rows", rows))),
            Err(e) => (failure, Some(e.to_string())),
        };

        ComponentCheck {
            name: name.to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}
