//! Curve builders
//!
//! - [`eff_graph`]: per-bin pass/total efficiency with Clopper-Pearson errors
//! - [`eff_vs_cut_graph`]: cumulative efficiency as a function of the cut
//! - [`roc_curve`]: signal vs background efficiency (or rejection)
//! - [`s_over_sqrt_b_graph`], [`s_over_b_graph`]: significance figures of merit
//!
//! Scan-based curves put the cut at the bin's lower edge, except the
//! significance graphs, which use the bin center. Each builder states its
//! own pass range explicitly.

use crate::error::CutScanResult;
use crate::graph::{AsymmetricErrors, AxisRange, Graph, GraphPoint};
use crate::histogram::Histogram;
use crate::interval::{clopper_pearson, Bound, DEFAULT_LEVEL};
use crate::scan::{require_entries, require_same_bins, ScanDirection};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Y-axis title of efficiency curves
pub const EFFICIENCY_TITLE: &str = "Efficiency";

/// Display ceiling of the S/√B graph
pub const S_OVER_SQRT_B_MAX: f64 = 500.0;

/// Display ceiling of the S/B graph
pub const S_OVER_B_MAX: f64 = 100.0;

/// Per-bin efficiency `pass / total` with 68.3% Clopper-Pearson errors
///
/// Both histograms must have the same binning. Bins with `total < 1` get
/// efficiency 0; bins with efficiency exactly 0 get no error bars.
pub fn eff_graph(pass: &Histogram, total: &Histogram) -> CutScanResult<Graph> {
    eff_graph_with_level(pass, total, DEFAULT_LEVEL)
}

/// Same as [`eff_graph`] at an arbitrary coverage level
pub fn eff_graph_with_level(pass: &Histogram, total: &Histogram, level: f64) -> CutScanResult<Graph> {
    let nbins = require_same_bins(pass, total)?;
    let mut points = Vec::with_capacity(nbins);

    for bin in 1..=nbins {
        let x = total.bin_center(bin);
        let half_width = 0.5 * total.bin_width(bin);
        let npass = pass.bin_content(bin);
        let ntotal = total.bin_content(bin);

        let eff = if ntotal < 1.0 { 0.0 } else { npass / ntotal };

        let (y_low, y_high) = if eff == 0.0 {
            (0.0, 0.0)
        } else {
            debug!(npass, ntotal, eff, "efficiency bin");
            let (n, k) = (ntotal as u32, npass as u32);
            (
                eff - clopper_pearson(n, k, level, Bound::Lower)?,
                clopper_pearson(n, k, level, Bound::Upper)? - eff,
            )
        };

        points.push(GraphPoint::with_errors(
            x,
            eff,
            AsymmetricErrors {
                x_low: half_width,
                x_high: half_width,
                y_low,
                y_high,
            },
        ));
    }

    Ok(Graph::new(points).with_axis_titles(pass.x_title(), EFFICIENCY_TITLE))
}

/// Cumulative efficiency at each bin's lower edge
///
/// Point `i` sits at the lower edge of bin `i + 1`. Forward passes count
/// bins `[i, nbins + 1]`, so the first point always holds every entry,
/// underflow included; reversed passes count bins `[0, i]`.
pub fn eff_vs_cut_graph(hist: &Histogram, direction: ScanDirection) -> CutScanResult<Graph> {
    let nbins = hist.nbins();
    let cumulative = hist.cumulative();
    let total = require_entries(hist, &cumulative)?;

    let points = (0..nbins)
        .map(|position| {
            let npass = match direction {
                ScanDirection::Forward => cumulative.integral(position, nbins + 1),
                ScanDirection::Reversed => cumulative.integral(0, position),
            };
            GraphPoint::new(hist.bin_low_edge(position + 1), npass / total)
        })
        .collect();

    Ok(Graph::new(points).with_axis_titles(hist.x_title(), EFFICIENCY_TITLE))
}

/// Options controlling how a ROC curve is laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RocOptions {
    /// Which side of the cut passes
    pub direction: ScanDirection,
    /// Plot `1 - eff(bkg)` instead of `eff(bkg)`
    pub background_rejection: bool,
    /// Put background on x and signal on y
    pub reverse_axes: bool,
}

impl RocOptions {
    pub fn new(direction: ScanDirection) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    /// Plot background rejection instead of background efficiency
    pub fn with_background_rejection(mut self, enabled: bool) -> Self {
        self.background_rejection = enabled;
        self
    }

    /// Swap axes so background is on x
    pub fn with_reversed_axes(mut self, enabled: bool) -> Self {
        self.reverse_axes = enabled;
        self
    }
}

/// Signal efficiency against background efficiency, one point per bin
///
/// Points are `(eff_sig, eff_bkg)` unless `reverse_axes` is set. Both
/// histograms must have the same number of bins.
pub fn roc_curve(
    signal: &Histogram,
    background: &Histogram,
    title: &str,
    options: RocOptions,
) -> CutScanResult<Graph> {
    let nbins = require_same_bins(signal, background)?;
    let sig_cumulative = signal.cumulative();
    let bkg_cumulative = background.cumulative();
    let sig_total = require_entries(signal, &sig_cumulative)?;
    let bkg_total = require_entries(background, &bkg_cumulative)?;

    let mut points = Vec::with_capacity(nbins);
    for position in 0..nbins {
        let (npass_sig, npass_bkg) = match options.direction {
            ScanDirection::Forward => (
                sig_cumulative.integral(position, nbins + 1),
                bkg_cumulative.integral(position, nbins + 1),
            ),
            ScanDirection::Reversed => (
                sig_cumulative.integral(0, position),
                bkg_cumulative.integral(0, position),
            ),
        };

        let eff_sig = npass_sig / sig_total;
        let eff_bkg = if options.background_rejection {
            1.0 - npass_bkg / bkg_total
        } else {
            npass_bkg / bkg_total
        };

        points.push(if options.reverse_axes {
            GraphPoint::new(eff_bkg, eff_sig)
        } else {
            GraphPoint::new(eff_sig, eff_bkg)
        });
    }

    Ok(Graph::new(points)
        .with_title(title)
        .with_x_range(AxisRange::unit())
        .with_y_range(AxisRange::unit()))
}

/// `eff_sig / sqrt(eff_bkg)`, or 0 when no background passes
pub fn s_over_sqrt_b(eff_sig: f64, eff_bkg: f64) -> f64 {
    if eff_bkg > 0.0 {
        eff_sig / eff_bkg.sqrt()
    } else {
        0.0
    }
}

/// `eff_sig / eff_bkg`, or 0 when no background passes
pub fn s_over_b(eff_sig: f64, eff_bkg: f64) -> f64 {
    if eff_bkg > 0.0 {
        eff_sig / eff_bkg
    } else {
        0.0
    }
}

/// S/√B figure of merit at each bin center
pub fn s_over_sqrt_b_graph(
    signal: &Histogram,
    background: &Histogram,
    title: &str,
    direction: ScanDirection,
) -> CutScanResult<Graph> {
    Ok(significance_graph(signal, background, direction, s_over_sqrt_b)?
        .with_title(title)
        .with_axis_titles(signal.x_title(), "ε(sig)/√ε(bkg)")
        .with_y_range(AxisRange::new(0.0, S_OVER_SQRT_B_MAX)))
}

/// S/B figure of merit at each bin center
pub fn s_over_b_graph(
    signal: &Histogram,
    background: &Histogram,
    title: &str,
    direction: ScanDirection,
) -> CutScanResult<Graph> {
    Ok(significance_graph(signal, background, direction, s_over_b)?
        .with_title(title)
        .with_axis_titles(signal.x_title(), "ε(sig)/ε(bkg)")
        .with_y_range(AxisRange::new(0.0, S_OVER_B_MAX)))
}

fn significance_graph(
    signal: &Histogram,
    background: &Histogram,
    direction: ScanDirection,
    metric: fn(f64, f64) -> f64,
) -> CutScanResult<Graph> {
    let nbins = require_same_bins(signal, background)?;
    let sig_cumulative = signal.cumulative();
    let bkg_cumulative = background.cumulative();
    let sig_total = require_entries(signal, &sig_cumulative)?;
    let bkg_total = require_entries(background, &bkg_cumulative)?;

    let points = (0..nbins)
        .map(|position| {
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
            let value = metric(npass_sig / sig_total, npass_bkg / bkg_total);
            GraphPoint::new(signal.bin_center(position + 1), value)
        })
        .collect();

    Ok(Graph::new(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CutScanError;

    fn tail_heavy() -> Histogram {
        Histogram::from_counts(
            "sig",
            0.0,
            1.0,
            &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 10.0, 90.0],
        )
        .unwrap()
        .with_x_title("disc")
    }

    fn flat(name: &str) -> Histogram {
        Histogram::from_counts(name, 0.0, 1.0, &[10.0; 10]).unwrap()
    }

    #[test]
    fn test_eff_vs_cut_forward_tail_heavy() {
        let graph = eff_vs_cut_graph(&tail_heavy(), ScanDirection::Forward).unwrap();
        assert_eq!(graph.len(), 10);
        assert_eq!(graph.x_title, "disc");
        assert_eq!(graph.y_title, EFFICIENCY_TITLE);

        // Position 9 still counts bin 9, so every point keeps all entries
        for point in &graph.points {
            assert!((point.y - 1.0).abs() < 1e-12, "x = {}", point.x);
        }
        assert!((graph.points[8].x - 0.8).abs() < 1e-12);
        assert!((graph.points[9].x - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_eff_vs_cut_reversed_tail_heavy() {
        let graph = eff_vs_cut_graph(&tail_heavy(), ScanDirection::Reversed).unwrap();
        for point in &graph.points[..9] {
            assert_eq!(point.y, 0.0);
        }
        // Bins [0, 9] hold the 10 entries of bin 9
        assert!((graph.points[9].y - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_eff_vs_cut_counts_underflow_at_first_position() {
        let mut hist = Histogram::from_counts("h", 0.0, 1.0, &[1.0; 4]).unwrap();
        hist.set_bin_content(0, 2.0);

        let ys = eff_vs_cut_graph(&hist, ScanDirection::Forward).unwrap().ys();
        let expected = [1.0, 4.0 / 6.0, 3.0 / 6.0, 2.0 / 6.0];
        for (y, want) in ys.iter().zip(expected) {
            assert!((y - want).abs() < 1e-12, "{} != {}", y, want);
        }

        let ys = eff_vs_cut_graph(&hist, ScanDirection::Reversed).unwrap().ys();
        let expected = [2.0 / 6.0, 3.0 / 6.0, 4.0 / 6.0, 5.0 / 6.0];
        for (y, want) in ys.iter().zip(expected) {
            assert!((y - want).abs() < 1e-12, "{} != {}", y, want);
        }
    }

    #[test]
    fn test_eff_vs_cut_empty_histogram() {
        let hist = Histogram::uniform("h_empty", 10, 0.0, 1.0).unwrap();
        assert!(matches!(
            eff_vs_cut_graph(&hist, ScanDirection::Forward),
            Err(CutScanError::EmptyHistogram { .. })
        ));
    }

    #[test]
    fn test_eff_graph_full_and_empty_bins() {
        let total = Histogram::from_counts("total", 0.0, 1.0, &[10.0, 10.0, 0.0, 4.0])
            .unwrap()
            .with_x_title("energy");
        let pass = Histogram::from_counts("pass", 0.0, 1.0, &[10.0, 0.0, 0.0, 1.0])
            .unwrap()
            .with_x_title("energy");

        let graph = eff_graph(&pass, &total).unwrap();
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.x_title, "energy");
        assert!(graph.has_errors());

        let full = graph.points[0];
        assert_eq!(full.y, 1.0);
        assert!((full.x - 0.125).abs() < 1e-12);
        let errors = full.errors.unwrap();
        assert!((errors.x_low - 0.125).abs() < 1e-12);
        assert!(errors.y_low > 0.0 && errors.y_low <= 1.0);
        assert_eq!(errors.y_high, 0.0);

        for point in &graph.points[1..3] {
            assert_eq!(point.y, 0.0);
            let errors = point.errors.unwrap();
            assert_eq!((errors.y_low, errors.y_high), (0.0, 0.0));
        }

        let partial = graph.points[3];
        assert!((partial.y - 0.25).abs() < 1e-12);
        let errors = partial.errors.unwrap();
        assert!(errors.y_low > 0.0 && errors.y_high > 0.0);
    }

    #[test]
    fn test_eff_graph_rejects_mismatched_binning() {
        let total = Histogram::uniform("total", 10, 0.0, 1.0).unwrap();
        let pass = Histogram::uniform("pass", 5, 0.0, 1.0).unwrap();
        assert_eq!(
            eff_graph(&pass, &total),
            Err(CutScanError::BinCountMismatch { left: 5, right: 10 })
        );
    }

    #[test]
    fn test_eff_graph_rejects_pass_above_total() {
        let total = Histogram::from_counts("total", 0.0, 1.0, &[2.0]).unwrap();
        let pass = Histogram::from_counts("pass", 0.0, 1.0, &[3.0]).unwrap();
        assert!(matches!(
            eff_graph(&pass, &total),
            Err(CutScanError::InvalidCounts { passed: 3, total: 2 })
        ));
    }

    #[test]
    fn test_roc_layout_options() {
        let sig = tail_heavy();
        let bkg = flat("bkg");

        let plain = roc_curve(&sig, &bkg, "plain", RocOptions::default()).unwrap();
        assert_eq!(plain.title, "plain");
        assert_eq!(plain.x_range, Some(AxisRange::unit()));
        // Position 9 keeps bins 9 and 10: eff_sig = 1.0, eff_bkg = 0.2
        let last = plain.points[9];
        assert!((last.x - 1.0).abs() < 1e-12);
        assert!((last.y - 0.2).abs() < 1e-12);
        assert_eq!(plain.points[0], GraphPoint::new(1.0, 1.0));

        let swapped = roc_curve(&sig, &bkg, "", RocOptions::default().with_reversed_axes(true)).unwrap();
        assert!((swapped.points[9].x - 0.2).abs() < 1e-12);
        assert!((swapped.points[9].y - 1.0).abs() < 1e-12);

        let rejection = roc_curve(
            &sig,
            &bkg,
            "",
            RocOptions::default().with_background_rejection(true),
        )
        .unwrap();
        assert!((rejection.points[9].y - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_roc_rejects_mismatched_bins() {
        let sig = tail_heavy();
        let bkg = Histogram::from_counts("bkg", 0.0, 1.0, &[1.0; 5]).unwrap();
        assert!(matches!(
            roc_curve(&sig, &bkg, "", RocOptions::default()),
            Err(CutScanError::BinCountMismatch { left: 10, right: 5 })
        ));
    }

    #[test]
    fn test_significance_uses_bin_centers() {
        let graph = s_over_sqrt_b_graph(&tail_heavy(), &flat("bkg"), "s/sqrt(b)", ScanDirection::Forward)
            .unwrap();
        assert!((graph.points[0].x - 0.05).abs() < 1e-12);
        assert_eq!(graph.y_range, Some(AxisRange::new(0.0, S_OVER_SQRT_B_MAX)));
        // Position 9: 1.0 / sqrt(0.2)
        assert!((graph.points[9].x - 0.95).abs() < 1e-12);
        assert!((graph.points[9].y - 1.0 / 0.2_f64.sqrt()).abs() < 1e-12);

        let graph = s_over_b_graph(&tail_heavy(), &flat("bkg"), "s/b", ScanDirection::Forward).unwrap();
        assert!((graph.points[9].y - 5.0).abs() < 1e-12);
        assert_eq!(graph.y_range, Some(AxisRange::new(0.0, S_OVER_B_MAX)));
    }

    #[test]
    fn test_significance_zero_without_background() {
        let sig = Histogram::from_counts("sig", 0.0, 1.0, &[1.0, 1.0, 1.0, 1.0]).unwrap();
        let bkg = Histogram::from_counts("bkg", 0.0, 1.0, &[5.0, 5.0, 0.0, 0.0]).unwrap();

        // Forward position 2 still counts bin 2; only position 3 loses all background
        let graph = s_over_sqrt_b_graph(&sig, &bkg, "", ScanDirection::Forward).unwrap();
        assert!(graph.points[..3].iter().all(|p| p.y > 0.0));
        assert_eq!(graph.points[3].y, 0.0);

        let graph = s_over_b_graph(&sig, &bkg, "", ScanDirection::Forward).unwrap();
        assert_eq!(graph.points[3].y, 0.0);
    }
}
