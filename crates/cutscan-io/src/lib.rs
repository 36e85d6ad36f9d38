//! cutscan-io - Evaluation tables in, histograms out
//!
//! Classifier evaluation jobs write one table per process with a row per
//! event and a column per discriminant (plus any event-level quantities
//! used for selections). This crate reads those tables and fills
//! [`cutscan_stats::Histogram`]s from one column under a selection.
//!
//! - **CSV/TSV**: delimited text with a header row
//!
//! # Design
//!
//! All readers implement the `EventSource` trait. Only the columns a fill
//! needs are parsed; cells that do not parse as numbers become NaN and are
//! skipped when filling.

pub mod fill;
pub mod reader;
pub mod schema;

#[cfg(feature = "csv")]
pub mod csv_reader;

pub use fill::*;
pub use reader::*;
pub use schema::*;
