//! Subcommand implementations
//!
//! - `roc`: ROC curves of every signal against the background, per discriminant
//! - `efficiency`: pass/total efficiency of one table with Clopper-Pearson errors
//! - `scan`: efficiency and significance vs cut for one signal/background pair

use crate::artifact::{
    roc_file_name, write_artifact, EfficiencyArtifact, LineStyle, RocArtifact, ScanArtifact,
    Series, SignalEfficiency, WorkingPoint,
};
use crate::config::{ConfigError, ProcessConfig, RunConfig};
use crate::error::CliResult;
use clap::Args;
use cutscan_io::{histogram_from_source, open_file, Binning, FillSummary};
use cutscan_selection::SelectionExpr;
use cutscan_stats::{
    cut_value_for_best_s_over_sqrt_b, cut_value_for_efficiency, eff_graph_with_level,
    eff_vs_cut_graph, efficiency_for_cut_value, roc_curve, s_over_b_graph, s_over_sqrt_b_graph,
    AxisRange, CutScanError, Histogram, RocOptions, ScanDirection, DEFAULT_LEVEL,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Axis titles of the ROC plot
pub const ROC_X_TITLE: &str = "ε(bkg)";
pub const ROC_Y_TITLE: &str = "ε(sig)";

/// Binning overrides; unset values come from the run config
#[derive(Debug, Clone, Default, Args)]
pub struct BinningArgs {
    /// Number of bins
    #[arg(long)]
    pub bins: Option<usize>,

    /// Lower edge of the first bin
    #[arg(long)]
    pub low: Option<f64>,

    /// Upper edge of the last bin
    #[arg(long)]
    pub high: Option<f64>,
}

impl BinningArgs {
    /// Apply the overrides on top of `base`
    pub fn resolve(&self, base: &Binning) -> Binning {
        Binning::new(
            self.bins.unwrap_or(base.bins),
            self.low.unwrap_or(base.low),
            self.high.unwrap_or(base.high),
        )
    }
}

#[derive(Debug, Clone, Args)]
pub struct RocArgs {
    /// Discriminant name
    #[arg(long, default_value = "bdt")]
    pub disc: String,

    /// Directory holding the evaluation tables
    #[arg(long)]
    pub dir: PathBuf,

    /// Second discriminant to compare against (needs --dir2)
    #[arg(long)]
    pub disc2: Option<String>,

    /// Directory holding the second discriminant's tables
    #[arg(long)]
    pub dir2: Option<PathBuf>,

    /// Directory the artifact is written to
    #[arg(long, default_value = "plots")]
    pub out_dir: PathBuf,

    /// Selection name from the config, or an expression
    #[arg(long, default_value = "base")]
    pub selection: String,

    /// Target background efficiency for the working point
    #[arg(long, default_value = "0.0001")]
    pub bkg_eff: f64,

    /// Log-scale x axis
    #[arg(long)]
    pub log: bool,

    /// Show the full [0, 1] range instead of the zoomed window
    #[arg(long)]
    pub no_zoom: bool,
}

#[derive(Debug, Clone, Args)]
pub struct EfficiencyArgs {
    /// Evaluation table
    #[arg(short, long)]
    pub input: PathBuf,

    /// Column to histogram
    #[arg(long)]
    pub column: String,

    #[command(flatten)]
    pub binning: BinningArgs,

    /// Denominator selection (name or expression)
    #[arg(long, default_value = "base")]
    pub selection: String,

    /// Numerator selection, applied on top of the denominator
    #[arg(long)]
    pub pass: String,

    /// Confidence level of the error bars
    #[arg(long, default_value_t = DEFAULT_LEVEL)]
    pub level: f64,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    /// Signal evaluation table
    #[arg(long)]
    pub signal: PathBuf,

    /// Background evaluation table
    #[arg(long)]
    pub background: PathBuf,

    /// Discriminant column
    #[arg(long)]
    pub column: String,

    #[command(flatten)]
    pub binning: BinningArgs,

    /// Selection name from the config, or an expression
    #[arg(long, default_value = "base")]
    pub selection: String,

    /// Keep events below the cut instead of above
    #[arg(long)]
    pub reversed: bool,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Histogram of one process for one discriminant
struct ProcessHistogram {
    process: ProcessConfig,
    hist: Histogram,
}

/// Fill one histogram per configured process
fn load_processes(
    config: &RunConfig,
    dir: &Path,
    disc: &str,
    selection_name: &str,
    selection: &SelectionExpr,
) -> CliResult<Vec<ProcessHistogram>> {
    let column = config.input.column_for(disc);

    let load = |process: &ProcessConfig| -> CliResult<ProcessHistogram> {
        let path = config.input.file_for(dir, &process.name, disc);
        let source = open_file(&path.to_string_lossy())?;
        let name = format!("h_discvalue_{}_{}_{}", disc, selection_name, process.name);
        let (hist, summary) =
            histogram_from_source(source.as_ref(), &name, &column, selection, &config.binning)?;
        info!(
            process = %process.name,
            disc,
            rows = summary.rows,
            selected = summary.selected,
            "filled discriminant histogram"
        );
        Ok(ProcessHistogram {
            process: process.clone(),
            hist,
        })
    };

    #[cfg(feature = "parallel")]
    let loaded = config.processes.par_iter().map(load).collect();

    #[cfg(not(feature = "parallel"))]
    let loaded = config.processes.iter().map(load).collect();

    loaded
}

/// Separate the background histogram from the signal histograms
fn split_background(
    mut histograms: Vec<ProcessHistogram>,
) -> Result<(ProcessHistogram, Vec<ProcessHistogram>), ConfigError> {
    let index = histograms
        .iter()
        .position(|h| h.process.is_background())
        .ok_or_else(|| ConfigError::MissingField("background process".to_string()))?;
    let background = histograms.remove(index);
    Ok((background, histograms))
}

/// Build ROC curves for every signal, write the artifact and return its path
pub fn run_roc(config: &RunConfig, args: &RocArgs) -> CliResult<(PathBuf, RocArtifact)> {
    let selection = config.selection_expr(&args.selection)?;
    config.background()?;
    let zoom = !args.no_zoom;

    let mut discriminants = vec![(args.disc.as_str(), args.dir.as_path())];
    match (&args.disc2, &args.dir2) {
        (Some(disc2), Some(dir2)) => discriminants.push((disc2.as_str(), dir2.as_path())),
        (None, None) => {}
        _ => warn!("comparison needs both --disc2 and --dir2; plotting a single discriminant"),
    }
    let comparing = discriminants.len() > 1;

    let mut series = Vec::new();
    let mut working_points = Vec::new();

    for (index, (disc, dir)) in discriminants.iter().enumerate() {
        let histograms = load_processes(config, dir, disc, &args.selection, &selection)?;
        let (background, signal_histograms) = split_background(histograms)?;
        let bkg = &background.hist;

        let reference_cut = config.lookups.reference_cut;
        let bkg_at_reference = efficiency_for_cut_value(bkg, reference_cut, ScanDirection::Forward)?;
        info!(
            disc,
            cut = reference_cut,
            eff = bkg_at_reference.efficiency,
            "background efficiency at reference cut"
        );

        let cut = cut_value_for_efficiency(bkg, args.bkg_eff, ScanDirection::Forward)?;
        info!(
            disc,
            target = args.bkg_eff,
            cut = cut.cut_value,
            eff = cut.metric,
            "cut value for target background efficiency"
        );

        let mut signals = Vec::new();
        for entry in &signal_histograms {
            let sig = &entry.hist;
            let at_reference = efficiency_for_cut_value(sig, reference_cut, ScanDirection::Forward)?;
            let at_cut = efficiency_for_cut_value(sig, cut.cut_value, ScanDirection::Forward)?;
            info!(
                disc,
                process = %entry.process.name,
                eff_at_reference = at_reference.efficiency,
                eff_at_cut = at_cut.efficiency,
                "signal efficiency"
            );
            signals.push(SignalEfficiency {
                process: entry.process.name.clone(),
                eff_at_reference: at_reference.efficiency,
                eff_at_cut: at_cut.efficiency,
            });

            let label = if comparing {
                format!("{}, {}", entry.process.label, disc)
            } else {
                entry.process.label.clone()
            };
            let options = RocOptions::new(ScanDirection::Forward).with_reversed_axes(true);
            let mut graph =
                roc_curve(sig, bkg, &label, options)?.with_axis_titles(ROC_X_TITLE, ROC_Y_TITLE);
            if zoom {
                graph = graph
                    .with_x_range(config.zoom.x_range())
                    .with_y_range(config.zoom.y_range());
            }

            series.push(Series {
                process: entry.process.name.clone(),
                discriminant: disc.to_string(),
                label,
                color: entry.process.color.clone(),
                style: if comparing && index == 0 {
                    LineStyle::Dashed
                } else {
                    LineStyle::Solid
                },
                graph,
            });
        }

        working_points.push(WorkingPoint {
            discriminant: disc.to_string(),
            reference_cut,
            bkg_eff_at_reference: bkg_at_reference.efficiency,
            target_bkg_eff: args.bkg_eff,
            cut,
            signals,
        });
    }

    let (x_range, y_range) = if zoom {
        (config.zoom.x_range(), config.zoom.y_range())
    } else {
        (AxisRange::unit(), AxisRange::unit())
    };

    let artifact = RocArtifact {
        selection: args.selection.clone(),
        x_title: ROC_X_TITLE.to_string(),
        y_title: ROC_Y_TITLE.to_string(),
        log_x: args.log,
        x_range,
        y_range,
        series,
        working_points,
    };

    let disc2 = if comparing {
        args.disc2.as_deref()
    } else {
        None
    };
    let path = args
        .out_dir
        .join(roc_file_name(&args.disc, disc2, &args.selection, zoom, args.log));
    write_artifact(&path, &artifact)?;
    Ok((path, artifact))
}

/// Fill one column of one table under a selection
fn load_column(
    path: &Path,
    name: &str,
    column: &str,
    selection: &SelectionExpr,
    binning: &Binning,
) -> CliResult<(Histogram, FillSummary)> {
    let source = open_file(&path.to_string_lossy())?;
    Ok(histogram_from_source(
        source.as_ref(),
        name,
        column,
        selection,
        binning,
    )?)
}

/// Pass/total efficiency of one table
pub fn run_efficiency(config: &RunConfig, args: &EfficiencyArgs) -> CliResult<EfficiencyArtifact> {
    let denominator = config.selection_expr(&args.selection)?;
    let numerator = SelectionExpr::and(denominator.clone(), config.selection_expr(&args.pass)?);
    let binning = args.binning.resolve(&config.binning);

    let (total, total_fill) = load_column(&args.input, "h_total", &args.column, &denominator, &binning)?;
    let (pass, pass_fill) = load_column(&args.input, "h_pass", &args.column, &numerator, &binning)?;
    info!(
        total = total_fill.filled,
        pass = pass_fill.filled,
        "filled efficiency histograms"
    );

    let graph = eff_graph_with_level(&pass, &total, args.level)?
        .with_title(format!("{} / {}", args.pass, args.selection));

    let artifact = EfficiencyArtifact {
        input: args.input.display().to_string(),
        column: args.column.clone(),
        selection: args.selection.clone(),
        pass: args.pass.clone(),
        total_fill,
        pass_fill,
        graph,
    };
    emit(args.output.as_deref(), &artifact)?;
    Ok(artifact)
}

/// Efficiency and significance vs cut for one signal/background pair
pub fn run_scan(config: &RunConfig, args: &ScanArgs) -> CliResult<ScanArtifact> {
    let selection = config.selection_expr(&args.selection)?;
    let binning = args.binning.resolve(&config.binning);
    let direction = ScanDirection::from_reversed(args.reversed);

    let (sig, _) = load_column(&args.signal, "h_sig", &args.column, &selection, &binning)?;
    let (bkg, _) = load_column(&args.background, "h_bkg", &args.column, &selection, &binning)?;

    let best_cut = match cut_value_for_best_s_over_sqrt_b(&sig, &bkg, direction) {
        Ok(best) => {
            info!(cut = best.cut_value, metric = best.metric, %direction, "best S/sqrt(B) cut");
            Some(best)
        }
        Err(CutScanError::NoQualifyingBin { search }) => {
            warn!(search = %search, "no cut keeps both signal and background");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let artifact = ScanArtifact {
        column: args.column.clone(),
        selection: args.selection.clone(),
        direction,
        signal_eff: eff_vs_cut_graph(&sig, direction)?.with_title("signal"),
        background_eff: eff_vs_cut_graph(&bkg, direction)?.with_title("background"),
        s_over_sqrt_b: s_over_sqrt_b_graph(&sig, &bkg, "S/√B", direction)?,
        s_over_b: s_over_b_graph(&sig, &bkg, "S/B", direction)?,
        best_cut,
    };
    emit(args.output.as_deref(), &artifact)?;
    Ok(artifact)
}

/// Write to `output`, or pretty-print to stdout
fn emit<T: Serialize>(output: Option<&Path>, value: &T) -> CliResult<()> {
    match output {
        Some(path) => write_artifact(path, value),
        None => {
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binning_overrides() {
        let base = Binning::default();
        let args = BinningArgs {
            bins: Some(50),
            low: None,
            high: Some(2.0),
        };
        assert_eq!(args.resolve(&base), Binning::new(50, 0.0, 2.0));
        assert_eq!(BinningArgs::default().resolve(&base), base);
    }

    fn loaded(config: &RunConfig) -> Vec<ProcessHistogram> {
        config
            .processes
            .iter()
            .map(|process| ProcessHistogram {
                process: process.clone(),
                hist: Histogram::uniform(process.name.clone(), 4, 0.0, 1.0).unwrap(),
            })
            .collect()
    }

    #[test]
    fn test_split_background() {
        let config = RunConfig::default();
        let (background, signals) = split_background(loaded(&config)).unwrap();
        assert!(background.process.is_background());
        assert_eq!(signals.len(), config.signals().count());
        assert!(signals.iter().all(|h| !h.process.is_background()));
    }

    #[test]
    fn test_split_without_background() {
        let mut config = RunConfig::default();
        config.processes.retain(|p| !p.is_background());
        assert!(matches!(
            split_background(loaded(&config)),
            Err(ConfigError::MissingField(_))
        ));
    }
}
