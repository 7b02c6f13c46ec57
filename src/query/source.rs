//! Access to the exported tables
//!
//! The query service never caches: each call re-reads its table so a freshly
//! published run is visible on the next request.

use crate::config::OutputSettings;
use crate::error::FightEloError;
use crate::export::{
    read_csv_table, LeaderboardRow, MatchRatingRow, RunManifest, LEADERBOARD_TABLE,
    MANIFEST_TABLE, MATCH_RATINGS_TABLE, STATS_TABLE,
};
use crate::rating::sort_leaderboard;
use crate::types::{LeaderboardEntry, StatsRecord};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub type TableResult<T> = std::result::Result<T, FightEloError>;

/// Read-only access to the derived tables
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Leaderboard in ranking order
    async fn leaderboard(&self) -> TableResult<Vec<LeaderboardEntry>>;

    async fn stats(&self) -> TableResult<Vec<StatsRecord>>;

    /// Rated bouts in source order
    async fn match_ratings(&self) -> TableResult<Vec<MatchRatingRow>>;

    async fn manifest(&self) -> TableResult<RunManifest>;
}

/// Tables read from an export directory
#[derive(Debug, Clone)]
pub struct FileTableSource {
    leaderboard_path: PathBuf,
    stats_path: PathBuf,
    match_ratings_path: PathBuf,
    manifest_path: PathBuf,
}

impl FileTableSource {
    /// Locate the tables inside `dir` using the configured file names
    pub fn new(dir: &Path, output: &OutputSettings) -> Self {
        Self {
            leaderboard_path: dir.join(&output.leaderboard_file),
            stats_path: dir.join(&output.stats_file),
            match_ratings_path: dir.join(&output.match_ratings_file),
            manifest_path: dir.join(&output.manifest_file),
        }
    }

    pub fn leaderboard_path(&self) -> &Path {
        &self.leaderboard_path
    }

    pub fn stats_path(&self) -> &Path {
        &self.stats_path
    }

    pub fn match_ratings_path(&self) -> &Path {
        &self.match_ratings_path
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    async fn read_csv<T>(&self, table: &str, path: &Path) -> TableResult<Vec<T>>
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || read_csv_table::<T>(&path))
            .await
            .map_err(|e| FightEloError::InternalError {
                message: format!("reading table {} panicked: {}", table, e),
            })?
            .map_err(|e| match e {
                FightEloError::TableUnavailable { message, .. } => {
                    FightEloError::TableUnavailable {
                        table: table.to_string(),
                        message,
                    }
                }
                other => other,
            })
    }
}

#[async_trait]
impl TableSource for FileTableSource {
    async fn leaderboard(&self) -> TableResult<Vec<LeaderboardEntry>> {
        let rows: Vec<LeaderboardRow> = self
            .read_csv(LEADERBOARD_TABLE, &self.leaderboard_path)
            .await?;
        let mut entries: Vec<LeaderboardEntry> = rows.into_iter().map(Into::into).collect();
        sort_leaderboard(&mut entries);
        Ok(entries)
    }

    async fn stats(&self) -> TableResult<Vec<StatsRecord>> {
        self.read_csv(STATS_TABLE, &self.stats_path).await
    }

    async fn match_ratings(&self) -> TableResult<Vec<MatchRatingRow>> {
        self.read_csv(MATCH_RATINGS_TABLE, &self.match_ratings_path)
            .await
    }

    async fn manifest(&self) -> TableResult<RunManifest> {
        let text = tokio::fs::read_to_string(&self.manifest_path)
            .await
            .map_err(|e| FightEloError::TableUnavailable {
                table: MANIFEST_TABLE.to_string(),
                message: e.to_string(),
            })?;

        serde_json::from_str(&text).map_err(|e| FightEloError::TableUnavailable {
            table: MANIFEST_TABLE.to_string(),
            message: e.to_string(),
        })
    }
}

/// Fixed in-memory tables, for tests and embedding
///
/// A table left as `None` behaves like a missing file.
#[derive(Debug, Clone, Default)]
pub struct StaticTableSource {
    pub leaderboard: Option<Vec<LeaderboardEntry>>,
    pub stats: Option<Vec<StatsRecord>>,
    pub match_ratings: Option<Vec<MatchRatingRow>>,
    pub manifest: Option<RunManifest>,
}

fn unavailable(table: &str) -> FightEloError {
    FightEloError::TableUnavailable {
        table: table.to_string(),
        message: "table not loaded".to_string(),
    }
}

#[async_trait]
impl TableSource for StaticTableSource {
    async fn leaderboard(&self) -> TableResult<Vec<LeaderboardEntry>> {
        let mut entries = self
            .leaderboard
            .clone()
            .ok_or_else(|| unavailable(LEADERBOARD_TABLE))?;
        sort_leaderboard(&mut entries);
        Ok(entries)
    }

    async fn stats(&self) -> TableResult<Vec<StatsRecord>> {
        self.stats.clone().ok_or_else(|| unavailable(STATS_TABLE))
    }

    async fn match_ratings(&self) -> TableResult<Vec<MatchRatingRow>> {
        self.match_ratings
            .clone()
            .ok_or_else(|| unavailable(MATCH_RATINGS_TABLE))
    }

    async fn manifest(&self) -> TableResult<RunManifest> {
        self.manifest
            .clone()
            .ok_or_else(|| unavailable(MANIFEST_TABLE))
    }
}
