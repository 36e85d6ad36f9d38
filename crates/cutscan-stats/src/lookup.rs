//! Cut-value and efficiency lookups
//!
//! All searches walk the bins in increasing order and only replace the
//! current best on a strict improvement, so the first of several equally
//! good bins wins. A search that never improves on its starting value
//! reports [`CutScanError::NoQualifyingBin`].

use crate::curves::s_over_sqrt_b;
use crate::error::{CutScanError, CutScanResult};
use crate::histogram::Histogram;
use crate::scan::{require_entries, require_same_bins, ScanDirection};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A cut value together with the figure of merit at that cut
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutLookup {
    /// Lower edge of the selected bin
    pub cut_value: f64,
    /// Efficiency or significance at the selected bin
    pub metric: f64,
}

impl CutLookup {
    /// `(cut_value, metric)`
    pub fn into_pair(self) -> (f64, f64) {
        (self.cut_value, self.metric)
    }
}

/// An efficiency together with the cut it was read at
///
/// Field order is efficiency first, unlike [`CutLookup`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyLookup {
    /// Efficiency at the selected bin
    pub efficiency: f64,
    /// Lower edge of the selected bin
    pub cut_value: f64,
}

impl EfficiencyLookup {
    /// `(efficiency, cut_value)`
    pub fn into_pair(self) -> (f64, f64) {
        (self.efficiency, self.cut_value)
    }
}

/// Cut whose cumulative efficiency is closest to `target`
///
/// Differences of 1.0 or more never qualify.
pub fn cut_value_for_efficiency(
    hist: &Histogram,
    target: f64,
    direction: ScanDirection,
) -> CutScanResult<CutLookup> {
    let nbins = hist.nbins();
    let cumulative = hist.cumulative();
    let total = require_entries(hist, &cumulative)?;

    let mut best_diff = 1.0;
    let mut best = None;

    for position in 0..nbins {
        let npass = match direction {
            ScanDirection::Forward => cumulative.integral(position, nbins + 1),
            ScanDirection::Reversed => cumulative.integral(0, position),
        };
        let eff = npass / total;
        let diff = (eff - target).abs();
        if diff < best_diff {
            best_diff = diff;
            best = Some(CutLookup {
                cut_value: hist.bin_low_edge(position + 1),
                metric: eff,
            });
        }
    }

    let found = best.ok_or_else(|| CutScanError::NoQualifyingBin {
        search: format!("efficiency {} in '{}'", target, hist.name()),
    })?;
    debug!(hist = hist.name(), target, cut = found.cut_value, eff = found.metric, "cut for efficiency");
    Ok(found)
}

/// Efficiency at the bin whose lower edge is closest to `cut`
///
/// Edges 1.0 or more away from `cut` never qualify.
pub fn efficiency_for_cut_value(
    hist: &Histogram,
    cut: f64,
    direction: ScanDirection,
) -> CutScanResult<EfficiencyLookup> {
    let nbins = hist.nbins();
    let cumulative = hist.cumulative();
    let total = require_entries(hist, &cumulative)?;

    let mut best_diff = 1.0;
    let mut best = None;

    for position in 0..nbins {
        let npass = match direction {
            ScanDirection::Forward => cumulative.integral(position, nbins + 1),
            ScanDirection::Reversed => cumulative.integral(0, position),
        };
        let edge = hist.bin_low_edge(position + 1);
        let diff = (edge - cut).abs();
        if diff < best_diff {
            best_diff = diff;
            best = Some(EfficiencyLookup {
                efficiency: npass / total,
                cut_value: edge,
            });
        }
    }

    let found = best.ok_or_else(|| CutScanError::NoQualifyingBin {
        search: format!("cut value {} in '{}'", cut, hist.name()),
    })?;
    debug!(hist = hist.name(), cut, edge = found.cut_value, eff = found.efficiency, "efficiency for cut");
    Ok(found)
}

/// Cut maximizing `eff_sig / sqrt(eff_bkg)`
///
/// Bins without background efficiency score 0, so only cuts with some
/// surviving background and a strictly positive figure of merit qualify.
pub fn cut_value_for_best_s_over_sqrt_b(
    signal: &Histogram,
    background: &Histogram,
    direction: ScanDirection,
) -> CutScanResult<CutLookup> {
    let nbins = require_same_bins(signal, background)?;
    let sig_cumulative = signal.cumulative();
    let bkg_cumulative = background.cumulative();
    let sig_total = require_entries(signal, &sig_cumulative)?;
    let bkg_total = require_entries(background, &bkg_cumulative)?;

    let mut best_metric = 0.0;
    let mut best = None;

    for position in 0..nbins {
        let (npass_sig, npass_bkg) = match direction {
            ScanDirection::Forward => (
                sig_cumulative.integral(position, nbins + 1),
                bkg_cumulative.integral(position, nbins + 1),
            ),
            ScanDirection::Reversed => (
                sig_cumulative.integral(0, position),
                bkg_cumulative.integral(0, position),
            ),
        };
        let metric = s_over_sqrt_b(npass_sig / sig_total, npass_bkg / bkg_total);
        if metric > best_metric {
            best_metric = metric;
            best = Some(CutLookup {
                cut_value: signal.bin_low_edge(position + 1),
                metric,
            });
        }
    }

    let found = best.ok_or_else(|| CutScanError::NoQualifyingBin {
        search: format!(
            "best S/sqrt(B) of '{}' over '{}'",
            signal.name(),
            background.name()
        ),
    })?;
    debug!(cut = found.cut_value, metric = found.metric, "best S/sqrt(B) cut");
    Ok(found)
}
