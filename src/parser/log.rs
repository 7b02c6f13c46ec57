//! Match log parsing
//!
//! Turns the raw CSV match log into an ordered sequence of [`MatchRecord`]s.
//! Rows without both competitor identities are dropped and reported; counter
//! fields never fail and read as zero when missing or malformed.

use crate::config::{ColumnMapping, InputSettings, OutcomeVocabulary};
use crate::error::{FightEloError, Result};
use crate::parser::columns::ColumnIndex;
use crate::types::{MatchRecord, Outcome};
use anyhow::Context;
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// A row that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedRow {
    /// 1-based data row number (the header is not counted)
    pub row: usize,
    pub reason: String,
}

/// Everything the parser learned from one log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseReport {
    pub records: Vec<MatchRecord>,
    pub dropped: Vec<DroppedRow>,
    /// Rows whose outcome token was outside the vocabulary
    pub unrecognized_outcomes: usize,
}

impl ParseReport {
    /// Number of data rows seen, valid or not
    pub fn rows_read(&self) -> usize {
        self.records.len() + self.dropped.len()
    }
}

/// Parser for match logs with a configurable layout
#[derive(Debug, Clone, Default)]
pub struct MatchLogParser {
    columns: ColumnMapping,
    vocabulary: OutcomeVocabulary,
}

impl MatchLogParser {
    pub fn new(columns: ColumnMapping, vocabulary: OutcomeVocabulary) -> Self {
        Self {
            columns,
            vocabulary,
        }
    }

    pub fn from_settings(settings: &InputSettings) -> Self {
        Self::new(settings.columns.clone(), settings.outcomes.clone())
    }

    /// Parse a log file; an unreadable file aborts the run
    pub fn parse_path(&self, path: &Path) -> Result<ParseReport> {
        let file = File::open(path).map_err(|e| FightEloError::InputUnavailable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        info!("Reading match log from {}", path.display());
        self.parse_reader(file)
            .with_context(|| format!("Failed to parse match log {}", path.display()))
    }

    /// Parse a log from any reader
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<ParseReport> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .context("Failed to read match log header")?
            .clone();
        let index = ColumnIndex::resolve(&headers, &self.columns)?;
        debug!("Resolved match log columns: {:?}", index);

        let mut report = ParseReport::default();

        for (sequence, result) in reader.records().enumerate() {
            let row = sequence + 1;
            let raw = match result {
                Ok(raw) => raw,
                Err(e) if e.is_io_error() => {
                    return Err(e).with_context(|| format!("I/O error reading row {}", row));
                }
                Err(e) => {
                    warn!("Dropping row {}: {}", row, e);
                    report.dropped.push(DroppedRow {
                        row,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match self.parse_row(&index, sequence, &raw) {
                Ok((record, recognized)) => {
                    if !recognized {
                        debug!(
                            "Row {}: outcome token '{}' treated as no contest",
                            row, record.outcome_token
                        );
                        report.unrecognized_outcomes += 1;
                    }
                    report.records.push(record);
                }
                Err(FightEloError::MalformedRow { reason, .. }) => {
                    warn!("Dropping row {}: {}", row, reason);
                    report.dropped.push(DroppedRow { row, reason });
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!(
            "Parsed {} match records ({} dropped, {} unrecognized outcomes)",
            report.records.len(),
            report.dropped.len(),
            report.unrecognized_outcomes
        );

        Ok(report)
    }

    /// Parse one data row; the flag tells whether the outcome token was known
    fn parse_row(
        &self,
        index: &ColumnIndex,
        sequence: usize,
        raw: &StringRecord,
    ) -> std::result::Result<(MatchRecord, bool), FightEloError> {
        let field = |position: usize| raw.get(position).map(str::trim).unwrap_or("");

        let competitor_a = field(index.competitor_a);
        if competitor_a.is_empty() {
            return Err(FightEloError::MalformedRow {
                row: sequence + 1,
                reason: "missing identity for competitor A".to_string(),
            });
        }
        let competitor_b = field(index.competitor_b);
        if competitor_b.is_empty() {
            return Err(FightEloError::MalformedRow {
                row: sequence + 1,
                reason: "missing identity for competitor B".to_string(),
            });
        }

        let token = field(index.outcome);
        let classified = self.vocabulary.classify(token);
        let event = index
            .event
            .map(field)
            .filter(|event| !event.is_empty())
            .map(str::to_string);

        let record = MatchRecord {
            sequence,
            competitor_a: competitor_a.to_string(),
            competitor_b: competitor_b.to_string(),
            outcome: classified.unwrap_or(Outcome::NoContest),
            outcome_token: token.to_string(),
            event,
            counters_a: index.side_a.read(raw),
            counters_b: index.side_b.read(raw),
        };

        Ok((record, classified.is_some()))
    }
}
