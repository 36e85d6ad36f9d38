//! Error types for cutscan-stats
//!
//! Every curve builder and lookup is a pure computation over in-memory
//! histograms, so failures are local to one call:
//! - Mismatched inputs (different bin counts, pass > total)
//! - Degenerate inputs (histograms with no entries)
//! - Searches that never find a qualifying bin

use thiserror::Error;

/// Main error type for cut-scan computations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CutScanError {
    /// Two histograms passed to a paired routine have different bin counts
    #[error("Histograms have different bin counts: {left} vs {right}")]
    BinCountMismatch { left: usize, right: usize },

    /// A histogram has a total count of zero, so efficiencies are undefined
    #[error("Histogram '{name}' has no entries")]
    EmptyHistogram { name: String },

    /// A lookup never satisfied its replacement condition
    #[error("No bin qualifies for {search}")]
    NoQualifyingBin { search: String },

    /// Pass count exceeds total count
    #[error("Invalid counts: {passed} passed out of {total}")]
    InvalidCounts { passed: u32, total: u32 },

    /// Confidence level outside (0, 1)
    #[error("Confidence level must be in (0, 1), got {0}")]
    InvalidLevel(f64),

    /// Histogram edges are unusable
    #[error("Invalid binning: {0}")]
    InvalidBinning(String),
}

/// Result type alias for cut-scan computations
pub type CutScanResult<T> = Result<T, CutScanError>;
