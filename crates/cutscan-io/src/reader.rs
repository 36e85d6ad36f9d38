//! Event source trait and common types
//!
//! The `EventSource` trait provides a uniform interface for reading
//! per-event evaluation tables from various file formats.

use crate::schema::{ColumnTable, TableSchema};
use cutscan_selection::EvalError;
use cutscan_stats::CutScanError;
use thiserror::Error;

/// Errors that can occur during I/O operations
#[derive(Debug, Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to open file: {0}")]
    OpenFailed(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Column not found: {column} in {path}")]
    ColumnNotFound { column: String, path: String },

    #[error("Selection failed: {0}")]
    Selection(#[from] EvalError),

    #[error("Histogram error: {0}")]
    Histogram(#[from] CutScanError),
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

/// Trait for reading per-event tables
pub trait EventSource: Send + Sync {
    /// Read the schema (column names, record count)
    fn read_schema(&self) -> IoResult<TableSchema>;

    /// Read the named columns as numbers
    ///
    /// Cells that do not parse become NaN.
    fn read_columns(&self, names: &[&str]) -> IoResult<ColumnTable>;

    /// Get the file path (if applicable)
    fn path(&self) -> Option<&str> {
        None
    }

    /// Get the format name
    fn format_name(&self) -> &'static str;
}

/// A boxed source for dynamic dispatch
pub type BoxedSource = Box<dyn EventSource>;

/// Open a file and return an appropriate source
///
/// The format is auto-detected from the file extension.
pub fn open_file(path: &str) -> IoResult<BoxedSource> {
    let extension = path
        .rsplit('.')
        .next()
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        #[cfg(feature = "csv")]
        "csv" => {
            use crate::csv_reader::CsvReader;
            Ok(Box::new(CsvReader::open(path)?))
        }

        #[cfg(feature = "csv")]
        "tsv" => {
            use crate::csv_reader::CsvReader;
            Ok(Box::new(CsvReader::open_with_delimiter(path, b'\t')?))
        }

        _ => Err(IoError::InvalidFormat(format!(
            "Unknown file extension: {}",
            extension
        ))),
    }
}

/// List supported file extensions
pub fn supported_extensions() -> Vec<&'static str> {
    let mut extensions = Vec::new();

    #[cfg(feature = "csv")]
    {
        extensions.push("csv");
        extensions.push("tsv");
    }

    extensions
}
