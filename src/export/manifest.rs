//! Run manifest written next to the exported tables

use crate::export::table::PublishedTable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row count of one published table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub name: String,
    pub file: String,
    pub rows: usize,
}

impl From<&PublishedTable> for TableSummary {
    fn from(table: &PublishedTable) -> Self {
        Self {
            name: table.name.clone(),
            file: table
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            rows: table.rows,
        }
    }
}

/// Description of one compute run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub input: String,
    pub rows_read: usize,
    pub matches: usize,
    pub dropped_rows: usize,
    pub unrecognized_outcomes: usize,
    pub competitors: usize,
    /// Calculator settings the ratings were produced with
    pub rating: serde_json::Value,
    pub tables: Vec<TableSummary>,
}

impl RunManifest {
    /// Look up a table's summary by name
    pub fn table(&self, name: &str) -> Option<&TableSummary> {
        self.tables.iter().find(|table| table.name == name)
    }
}
