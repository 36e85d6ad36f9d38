//! cutscan binary
//!
//! Log verbosity comes from `CUTSCAN_LOG` (an `EnvFilter` directive) when
//! set, else from `--log-level`.

use clap::{Parser, Subcommand};
use cutscan::{run_efficiency, run_roc, run_scan, EfficiencyArgs, RocArgs, RunConfig, ScanArgs};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cutscan")]
#[command(about = "cutscan - ROC curves, efficiencies and cut scans for classifier outputs")]
#[command(version)]
struct Cli {
    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: tracing::Level,

    /// Run config (TOML or JSON); defaults to the user config, then built-ins
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// ROC curves of every signal process against the background
    Roc(RocArgs),

    /// Pass/total efficiency with Clopper-Pearson errors
    Efficiency(EfficiencyArgs),

    /// Efficiency, S/√B and S/B as a function of the cut
    Scan(ScanArgs),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("CUTSCAN_LOG")
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = RunConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Roc(args) => {
            let (path, _) = run_roc(&config, &args)?;
            println!("{}", path.display());
        }
        Commands::Efficiency(args) => {
            run_efficiency(&config, &args)?;
        }
        Commands::Scan(args) => {
            run_scan(&config, &args)?;
        }
    }

    Ok(())
}
