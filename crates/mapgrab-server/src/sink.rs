//! Append-only destination for ingested records.
//!
//! The sink is a plain ordered log: no keys, no dedup, a write is a pure
//! append. Concurrent batches are serialized behind a single writer lock so
//! rows never interleave. The concrete format lives behind [`RecordSink`]
//! so the server and its tests don't care what the file looks like.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mapgrab_core::{BusinessRecord, SINK_COLUMNS};
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sink write error at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Outcome of one batch append. `saved + errors` equals the batch size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppendReport {
    pub saved: usize,
    pub errors: usize,
}

#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Appends `records` in arrival order. A failed record is counted in
    /// the report and skipped; it never blocks its siblings.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` only when the batch as a whole could not be made
    /// durable (the destination is gone or flushing failed).
    async fn append(&self, records: &[BusinessRecord]) -> Result<AppendReport, SinkError>;

    /// Destination reported by `/stats` and ingest responses.
    fn location(&self) -> &Path;
}

/// CSV-file sink with the fixed [`SINK_COLUMNS`] layout.
pub struct CsvSink {
    path: PathBuf,
    writer: Mutex<csv::Writer<std::fs::File>>,
}

impl CsvSink {
    /// Opens the sink at `path`, creating parent directories as needed.
    ///
    /// Initialization is idempotent: an existing file is opened for append
    /// with its contents untouched; a missing file is created and seeded
    /// with the column header before the first row.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` if the file cannot be created or opened — a
    /// startup-fatal condition for the server.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let path = path.into();
        let io_err = |source| SinkError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let already_existed = path.exists();
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(io_err)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if already_existed {
            tracing::info!(path = %path.display(), "appending to existing sink file");
        } else {
            writer.write_record(SINK_COLUMNS).map_err(|source| SinkError::Write {
                path: path.clone(),
                source,
            })?;
            writer.flush().map_err(io_err)?;
            tracing::info!(path = %path.display(), "created new sink file");
        }

        Ok(Self {
            path,
            writer: Mutex::new(writer),
        })
    }
}

#[async_trait]
impl RecordSink for CsvSink {
    async fn append(&self, records: &[BusinessRecord]) -> Result<AppendReport, SinkError> {
        let mut writer = self.writer.lock().await;
        let mut report = AppendReport::default();

        for record in records {
            match writer.write_record(&record.sink_row()) {
                Ok(()) => report.saved += 1,
                Err(source) => {
                    report.errors += 1;
                    tracing::error!(
                        path = %self.path.display(),
                        error = %source,
                        "failed to append record"
                    );
                }
            }
        }

        writer.flush().map_err(|source| SinkError::Io {
            path: self.path.clone(),
            source,
        })?;

        Ok(report)
    }

    fn location(&self) -> &Path {
        &self.path
    }
}
