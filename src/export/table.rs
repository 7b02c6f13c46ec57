//! Atomic table export
//!
//! Tables are staged as temporary files inside the output directory and only
//! renamed over their final names once every table has been written. A
//! failure while staging leaves the previously published tables untouched.

use crate::error::{FightEloError, Result};
use crate::export::rows::TableRow;
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, error, info};

/// A table written to a temp file and waiting to be published
#[derive(Debug)]
struct StagedTable {
    name: String,
    target: PathBuf,
    rows: usize,
    file: NamedTempFile,
}

/// A table that has been renamed into place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedTable {
    pub name: String,
    pub path: PathBuf,
    pub rows: usize,
}

/// Stages tables and publishes them together
#[derive(Debug)]
pub struct TableExporter {
    output_dir: PathBuf,
    staged: Vec<StagedTable>,
    /// Tables from earlier runs to delete once everything is published
    retired: Vec<(String, PathBuf)>,
}

impl TableExporter {
    /// Create an exporter for the given directory, creating it if needed
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir).map_err(|e| FightEloError::ExportFailed {
            table: output_dir.display().to_string(),
            message: format!("cannot create output directory: {}", e),
        })?;

        Ok(Self {
            output_dir,
            staged: Vec::new(),
            retired: Vec::new(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Names of the tables staged so far
    pub fn staged_tables(&self) -> Vec<&str> {
        self.staged.iter().map(|table| table.name.as_str()).collect()
    }

    fn temp_file(&self, name: &str) -> Result<NamedTempFile> {
        tempfile::Builder::new()
            .prefix(&format!(".{}-", name))
            .suffix(".tmp")
            .tempfile_in(&self.output_dir)
            .map_err(|e| {
                FightEloError::ExportFailed {
                    table: name.to_string(),
                    message: format!("cannot create staging file: {}", e),
                }
                .into()
            })
    }

    /// Write a CSV table to a staging file; the header is always present
    pub fn stage_csv<T, I>(&mut self, name: &str, file_name: &str, rows: I) -> Result<usize>
    where
        T: TableRow,
        I: IntoIterator<Item = T>,
    {
        let mut file = self.temp_file(name)?;

        let written = {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(file.as_file_mut());

            writer
                .write_record(T::HEADERS)
                .with_context(|| format!("Failed to write header of table {}", name))?;

            let mut written = 0;
            for row in rows {
                writer
                    .serialize(&row)
                    .with_context(|| format!("Failed to write row {} of table {}", written + 1, name))?;
                written += 1;
            }

            writer
                .flush()
                .with_context(|| format!("Failed to flush table {}", name))?;
            written
        };

        self.finish_stage(name, file_name, file, written)?;
        Ok(written)
    }

    /// Write a JSON document to a staging file
    pub fn stage_json<T: Serialize>(&mut self, name: &str, file_name: &str, value: &T) -> Result<()> {
        let mut file = self.temp_file(name)?;

        serde_json::to_writer_pretty(file.as_file_mut(), value)
            .with_context(|| format!("Failed to serialize {}", name))?;
        file.as_file_mut()
            .write_all(b"\n")
            .with_context(|| format!("Failed to write {}", name))?;

        self.finish_stage(name, file_name, file, 1)
    }

    fn finish_stage(
        &mut self,
        name: &str,
        file_name: &str,
        file: NamedTempFile,
        rows: usize,
    ) -> Result<()> {
        file.as_file()
            .sync_all()
            .with_context(|| format!("Failed to sync staged table {}", name))?;

        let target = self.output_dir.join(file_name);
        debug!(
            "Staged table {} ({} rows) at {}",
            name,
            rows,
            file.path().display()
        );

        self.staged.push(StagedTable {
            name: name.to_string(),
            target,
            rows,
            file,
        });
        Ok(())
    }

    /// Drop a table this run does not produce
    ///
    /// The file is removed by [`publish`](Self::publish) after every staged
    /// table is in place, so readers never pair it with newer tables.
    pub fn retire(&mut self, name: &str, file_name: &str) {
        let path = self.output_dir.join(file_name);
        self.retired.push((name.to_string(), path));
    }

    /// Rename every staged table over its final name, then remove retired tables
    ///
    /// Each rename is atomic but the set is not: if a rename fails, the tables
    /// renamed before it stay published and the error names them. Callers that
    /// write a manifest do so after this returns, so the manifest only ever
    /// describes a complete set.
    pub fn publish(self) -> Result<Vec<PublishedTable>> {
        let mut published: Vec<PublishedTable> = Vec::with_capacity(self.staged.len());

        for table in self.staged {
            if let Err(e) = table.file.persist(&table.target) {
                let done: Vec<&str> = published.iter().map(|t| t.name.as_str()).collect();
                error!(
                    "Publishing table {} failed after {:?} were replaced",
                    table.name, done
                );
                return Err(FightEloError::ExportFailed {
                    table: table.name.clone(),
                    message: format!(
                        "cannot publish to {}: {} (already published: {})",
                        table.target.display(),
                        e.error,
                        if done.is_empty() { "none".to_string() } else { done.join(", ") }
                    ),
                }
                .into());
            }

            info!(
                "Published table {} ({} rows) to {}",
                table.name,
                table.rows,
                table.target.display()
            );
            published.push(PublishedTable {
                name: table.name,
                path: table.target,
                rows: table.rows,
            });
        }

        for (name, path) in self.retired {
            match std::fs::remove_file(&path) {
                Ok(()) => info!("Removed stale table {} at {}", name, path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(FightEloError::ExportFailed {
                        table: name,
                        message: format!("cannot remove stale {}: {}", path.display(), e),
                    }
                    .into())
                }
            }
        }

        Ok(published)
    }
}

/// Read every row of an exported CSV table
pub fn read_csv_table<T: DeserializeOwned>(path: &Path) -> std::result::Result<Vec<T>, FightEloError> {
    let table = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut reader = csv::Reader::from_path(path).map_err(|e| FightEloError::TableUnavailable {
        table: table.clone(),
        message: e.to_string(),
    })?;

    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, csv::Error>>()
        .map_err(|e| FightEloError::TableUnavailable {
            table,
            message: e.to_string(),
        })
}
