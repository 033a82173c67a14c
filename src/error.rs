//! Error taxonomy for the snapshot store and history selector.
//!
//! Report assembly never fails (missing sections degrade to
//! placeholders), so no error type exists for it.

use thiserror::Error;

/// Failures while reading or writing snapshot files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Failures while building a trailing history window.
///
/// Both variants are fatal to the chart-building step only; they must
/// never block other sources' refreshes or the report build.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// No dated snapshot and no `latest` alias exist for the source.
    #[error("no snapshot files found for source '{source_id}'; run a refresh first")]
    NoDataAvailable { source_id: String },
    /// Snapshot files exist but none yielded a usable numeric value.
    #[error("snapshot files exist for source '{source_id}' but none had a numeric value")]
    NoNumericData { source_id: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}
