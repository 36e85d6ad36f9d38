//! cutscan-stats - Cut-scan statistics for discriminant histograms
//!
//! Given binned distributions of a discriminant (a classifier output, say)
//! for signal and background, this crate scans a threshold over the bins
//! and derives:
//!
//! - **Efficiency curves**: cumulative pass fraction vs cut value
//! - **Measured efficiencies**: pass/total per bin with Clopper-Pearson errors
//! - **ROC curves**: signal efficiency vs background efficiency or rejection
//! - **Significance curves**: S/√B and S/B figures of merit
//! - **Lookups**: cut for a target efficiency, efficiency at a cut, best S/√B cut
//!
//! # Example
//!
//! ```
//! use cutscan_stats::{eff_vs_cut_graph, Histogram, ScanDirection};
//!
//! let mut hist = Histogram::uniform("disc", 10, 0.0, 1.0)?;
//! for x in [0.05, 0.42, 0.87, 0.91] {
//!     hist.fill(x);
//! }
//! let graph = eff_vs_cut_graph(&hist, ScanDirection::Forward)?;
//! assert_eq!(graph.points[0].y, 1.0);
//! # Ok::<(), cutscan_stats::CutScanError>(())
//! ```

pub mod curves;
pub mod error;
pub mod graph;
pub mod histogram;
pub mod interval;
pub mod lookup;
pub mod scan;

pub use curves::*;
pub use error::*;
pub use graph::*;
pub use histogram::*;
pub use interval::*;
pub use lookup::*;
pub use scan::*;
