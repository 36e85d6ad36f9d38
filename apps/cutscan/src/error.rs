//! Error type for the command-line driver

use crate::config::ConfigError;
use cutscan_io::IoError;
use cutscan_stats::CutScanError;
use std::path::PathBuf;
use thiserror::Error;

/// Anything that can stop a run
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Io(#[from] IoError),

    #[error("Statistics error: {0}")]
    Stats(#[from] CutScanError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command-line runs
pub type CliResult<T> = Result<T, CliError>;
