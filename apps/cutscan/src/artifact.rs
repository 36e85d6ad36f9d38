//! Plot-ready JSON artifacts
//!
//! Each run writes one JSON document holding the curves (points, errors,
//! axis titles, range hints) plus the numbers it reported. Rendering is
//! left to whatever reads the file.

use crate::error::{CliError, CliResult};
use cutscan_io::FillSummary;
use cutscan_stats::{AxisRange, CutLookup, Graph, ScanDirection};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Line style hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// One curve with its legend entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Process name
    pub process: String,
    /// Discriminant the curve was built from
    pub discriminant: String,
    /// Legend label
    pub label: String,
    /// Line color hint
    pub color: String,
    /// Line style hint
    pub style: LineStyle,
    /// The curve itself
    pub graph: Graph,
}

/// Signal efficiencies reported for one discriminant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEfficiency {
    pub process: String,
    /// Efficiency at the reference cut
    pub eff_at_reference: f64,
    /// Efficiency at the cut matching the target background efficiency
    pub eff_at_cut: f64,
}

/// Lookups reported for one discriminant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingPoint {
    pub discriminant: String,
    /// Cut value used for the reference efficiencies
    pub reference_cut: f64,
    /// Background efficiency at the reference cut
    pub bkg_eff_at_reference: f64,
    /// Requested background efficiency
    pub target_bkg_eff: f64,
    /// Cut value whose background efficiency is closest to the target
    pub cut: CutLookup,
    pub signals: Vec<SignalEfficiency>,
}

/// Output of `cutscan roc`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocArtifact {
    pub selection: String,
    pub x_title: String,
    pub y_title: String,
    /// Draw the x axis on a log scale
    pub log_x: bool,
    /// View range hints (the zoomed window when zoom is on)
    pub x_range: AxisRange,
    pub y_range: AxisRange,
    pub series: Vec<Series>,
    pub working_points: Vec<WorkingPoint>,
}

/// Output of `cutscan efficiency`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyArtifact {
    pub input: String,
    pub column: String,
    /// Denominator selection
    pub selection: String,
    /// Numerator selection (applied on top of the denominator)
    pub pass: String,
    pub total_fill: FillSummary,
    pub pass_fill: FillSummary,
    pub graph: Graph,
}

/// Output of `cutscan scan`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanArtifact {
    pub column: String,
    pub selection: String,
    pub direction: ScanDirection,
    pub signal_eff: Graph,
    pub background_eff: Graph,
    pub s_over_sqrt_b: Graph,
    pub s_over_b: Graph,
    /// Cut maximizing S/√B, absent when no cut keeps both signal and background
    pub best_cut: Option<CutLookup>,
}

/// File name of a ROC artifact
///
/// `{disc}[_{disc2}]_roc_{selection}[_zoom][_log].json`. Characters of a
/// selection expression that are awkward in file names become `_`.
pub fn roc_file_name(
    disc: &str,
    disc2: Option<&str>,
    selection: &str,
    zoom: bool,
    log: bool,
) -> String {
    let mut name = disc.to_string();
    if let Some(second) = disc2 {
        name.push('_');
        name.push_str(second);
    }
    name.push_str("_roc_");
    name.extend(selection.chars().map(|c| {
        if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
            c
        } else {
            '_'
        }
    }));
    if zoom {
        name.push_str("_zoom");
    }
    if log {
        name.push_str("_log");
    }
    name.push_str(".json");
    name
}

/// Write `value` as pretty JSON, creating parent directories as needed
pub fn write_artifact<T: Serialize>(path: &Path, value: &T) -> CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| CliError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "wrote artifact");
    Ok(())
}
