//! Error types for ce-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Structural errors that abort the processing of a single worksheet.
///
/// Cell-level problems (blank, `NA`, unparseable numbers) and unreadable
/// release dates never surface here; they only suppress output.
#[derive(Debug, Error)]
pub enum Error {
    /// Period identifier is not six ASCII digits `YYYYMM`
    #[error("invalid period '{0}': expected a 6-digit string YYYYMM")]
    InvalidPeriod(String),

    /// Sheet name is empty after trimming
    #[error("sheet name must be a non-empty string")]
    InvalidSheetName,

    /// Source document could not be opened
    #[error("source '{source_id}' not found: {message}")]
    SourceNotFound { source_id: String, message: String },

    /// Named sheet is absent from the source
    #[error("sheet '{sheet}' not found in source '{source_id}'")]
    SheetNotFound { source_id: String, sheet: String },

    /// Grid has fewer rows than the header window needs
    #[error("worksheet has {actual} rows, header window needs at least {required}")]
    GridTooSmall { required: usize, actual: usize },

    /// Layout configuration is inconsistent
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Workbook was opened but a sheet could not be decoded
    #[error("failed to read sheet '{sheet}' of '{path}': {message}")]
    Workbook {
        path: PathBuf,
        sheet: String,
        message: String,
    },

    /// CSV parsing or writing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
