//! Scan direction and shared input checks for cut scans
//!
//! A cut scan walks `nbins` positions in increasing order. Position `i`
//! (0-based) reports the lower edge of bin `i + 1` as its cut value, while
//! the pass range is anchored at histogram index `i` (0 is the underflow):
//!
//! - **Forward**: events in bins `[i, nbins + 1]` pass
//! - **Reversed**: events in bins `[0, i]` pass
//!
//! Forward position 0 therefore counts every entry. The two ranges overlap
//! in bin `i`, so they are not complements, and the last reversed position
//! leaves out the last regular bin and the overflow.

use crate::error::{CutScanError, CutScanResult};
use crate::histogram::{Cumulative, Histogram};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side of the threshold counts as passing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanDirection {
    /// Keep events above the threshold
    #[default]
    Forward,
    /// Keep events below the threshold
    Reversed,
}

impl ScanDirection {
    /// Map a "reverse cut direction" flag onto a direction
    pub fn from_reversed(reversed: bool) -> Self {
        if reversed {
            ScanDirection::Reversed
        } else {
            ScanDirection::Forward
        }
    }

    /// Check if this is the reversed direction
    pub fn is_reversed(&self) -> bool {
        matches!(self, ScanDirection::Reversed)
    }
}

impl fmt::Display for ScanDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanDirection::Forward => write!(f, "forward"),
            ScanDirection::Reversed => write!(f, "reversed"),
        }
    }
}

impl FromStr for ScanDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forward" | "above" => Ok(ScanDirection::Forward),
            "reversed" | "reverse" | "below" => Ok(ScanDirection::Reversed),
            other => Err(format!("unknown scan direction: {}", other)),
        }
    }
}

/// Total count of a histogram, rejecting empty histograms
pub(crate) fn require_entries(hist: &Histogram, cumulative: &Cumulative) -> CutScanResult<f64> {
    let total = cumulative.total();
    if total == 0.0 {
        return Err(CutScanError::EmptyHistogram {
            name: hist.name().to_string(),
        });
    }
    Ok(total)
}

/// Reject histogram pairs with different bin counts
pub(crate) fn require_same_bins(left: &Histogram, right: &Histogram) -> CutScanResult<usize> {
    if left.nbins() != right.nbins() {
        return Err(CutScanError::BinCountMismatch {
            left: left.nbins(),
            right: right.nbins(),
        });
    }
    Ok(left.nbins())
}
