//! Run configuration
//!
//! Processes, named selections, binning and input naming for a cutscan run.
//! Every section has defaults, so a config file only needs the parts it
//! changes.

use cutscan_io::Binning;
use cutscan_selection::{parse_selection, ParseError, SelectionExpr};
use cutscan_stats::AxisRange;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Whether a process is a signal hypothesis or the background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessRole {
    Signal,
    Background,
}

/// One input process (one evaluation table per discriminant)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// Name used in file names, e.g. `0.001` or `bkg`
    pub name: String,
    /// Legend label
    pub label: String,
    /// Line color hint for the renderer
    pub color: String,
    /// Signal or background
    pub role: ProcessRole,
}

impl ProcessConfig {
    /// Create a new process
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        color: impl Into<String>,
        role: ProcessRole,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            color: color.into(),
            role,
        }
    }

    /// Check if this is the background process
    pub fn is_background(&self) -> bool {
        self.role == ProcessRole::Background
    }
}

/// Where evaluation tables live and how their discriminant columns are named
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Table path with `{dir}`, `{process}` and `{disc}` placeholders
    pub file_pattern: String,
    /// Column name with a `{disc}` placeholder
    pub column_pattern: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            file_pattern: "{dir}/{process}_{disc}_eval.csv".to_string(),
            column_pattern: "discValue_{disc}".to_string(),
        }
    }
}

impl InputConfig {
    /// Table path for one process and discriminant
    pub fn file_for(&self, dir: &Path, process: &str, disc: &str) -> PathBuf {
        PathBuf::from(
            self.file_pattern
                .replace("{dir}", &dir.to_string_lossy())
                .replace("{process}", process)
                .replace("{disc}", disc),
        )
    }

    /// Discriminant column name
    pub fn column_for(&self, disc: &str) -> String {
        self.column_pattern.replace("{disc}", disc)
    }
}

/// Fixed points reported by the ROC run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Cut value at which efficiencies are always reported
    pub reference_cut: f64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self { reference_cut: 0.99 }
    }
}

/// Axis ranges of the zoomed ROC view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Background efficiency range
    pub x: [f64; 2],
    /// Signal efficiency range
    pub y: [f64; 2],
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            x: [1e-4, 5e-3],
            y: [0.5, 1.0],
        }
    }
}

impl ZoomConfig {
    pub fn x_range(&self) -> AxisRange {
        AxisRange::new(self.x[0], self.x[1])
    }

    pub fn y_range(&self) -> AxisRange {
        AxisRange::new(self.y[0], self.y[1])
    }
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Signal and background processes
    pub processes: Vec<ProcessConfig>,
    /// Named selection expressions
    pub selections: BTreeMap<String, String>,
    /// Discriminant histogram binning
    pub binning: Binning,
    /// Input naming
    pub input: InputConfig,
    /// Reported lookups
    pub lookups: LookupConfig,
    /// Zoomed view
    pub zoom: ZoomConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        let processes = vec![
            ProcessConfig::new("0.001", "m_{A'} = 0.001 GeV", "#d95f02", ProcessRole::Signal),
            ProcessConfig::new("0.01", "m_{A'} = 0.01 GeV", "#7570b3", ProcessRole::Signal),
            ProcessConfig::new("0.1", "m_{A'} = 0.1 GeV", "#e7298a", ProcessRole::Signal),
            ProcessConfig::new("1.0", "m_{A'} = 1 GeV", "#66a61e", ProcessRole::Signal),
            ProcessConfig::new("bkg", "Photonuclear", "#1b9e77", ProcessRole::Background),
        ];

        let mut selections = BTreeMap::new();
        selections.insert("base".to_string(), "1 == 1".to_string());

        Self {
            processes,
            selections,
            binning: Binning::default(),
            input: InputConfig::default(),
            lookups: LookupConfig::default(),
            zoom: ZoomConfig::default(),
        }
    }
}

impl RunConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a config file; `.json` files are read as JSON, anything else as TOML
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Self::from_json(&text)
        } else {
            Self::from_toml(&text)
        }
    }

    /// User config location: `<config dir>/cutscan/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cutscan").join("config.toml"))
    }

    /// Load from `explicit`, else from the user config if it exists, else defaults
    ///
    /// The result is validated in every case.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => {
                info!(path = %path.display(), "loading config");
                Self::load(path)?
            }
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => {
                    info!(path = %path.display(), "loading user config");
                    Self::load(&path)?
                }
                None => {
                    debug!("no config file, using defaults");
                    Self::default()
                }
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Signal processes in file order
    pub fn signals(&self) -> impl Iterator<Item = &ProcessConfig> {
        self.processes.iter().filter(|p| !p.is_background())
    }

    /// The background process
    pub fn background(&self) -> Result<&ProcessConfig, ConfigError> {
        self.processes
            .iter()
            .find(|p| p.is_background())
            .ok_or_else(|| ConfigError::MissingField("background process".to_string()))
    }

    /// Resolve a selection by name, or parse it as an expression
    ///
    /// Names from `selections` win over expressions with the same text.
    pub fn selection_expr(&self, selection: &str) -> Result<SelectionExpr, ConfigError> {
        if let Some(expr) = self.selections.get(selection) {
            return parse_selection(expr).map_err(|source| ConfigError::Selection {
                name: selection.to_string(),
                source,
            });
        }

        parse_selection(selection).map_err(|source| {
            let bare_name = selection.chars().all(|c| c.is_alphanumeric() || c == '_');
            if bare_name {
                ConfigError::UnknownSelection(selection.to_string())
            } else {
                ConfigError::Selection {
                    name: selection.to_string(),
                    source,
                }
            }
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.signals().next().is_none() {
            return Err(ConfigError::MissingField(
                "at least one signal process".to_string(),
            ));
        }

        let backgrounds = self.processes.iter().filter(|p| p.is_background()).count();
        if backgrounds != 1 {
            return Err(ConfigError::OutOfRange(format!(
                "exactly one background process is required, found {}",
                backgrounds
            )));
        }

        let mut names = HashSet::new();
        for process in &self.processes {
            if !names.insert(process.name.as_str()) {
                return Err(ConfigError::OutOfRange(format!(
                    "duplicate process name '{}'",
                    process.name
                )));
            }
        }

        if self.binning.bins == 0 {
            return Err(ConfigError::OutOfRange(
                "binning.bins must be positive".to_string(),
            ));
        }

        if !(self.binning.low < self.binning.high) {
            return Err(ConfigError::OutOfRange(
                "binning.low must be less than binning.high".to_string(),
            ));
        }

        if !(self.zoom.x[0] < self.zoom.x[1]) || !(self.zoom.y[0] < self.zoom.y[1]) {
            return Err(ConfigError::OutOfRange(
                "zoom ranges must be increasing".to_string(),
            ));
        }

        if !self.lookups.reference_cut.is_finite() {
            return Err(ConfigError::OutOfRange(
                "lookups.reference_cut must be finite".to_string(),
            ));
        }

        for name in self.selections.keys() {
            self.selection_expr(name)?;
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to write TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Unknown selection: {0}")]
    UnknownSelection(String),

    #[error("Selection '{name}' does not parse: {source}")]
    Selection {
        name: String,
        #[source]
        source: ParseError,
    },
}
