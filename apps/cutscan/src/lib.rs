//! cutscan - ROC curves, efficiencies and cut scans from evaluation tables
//!
//! The binary in `main.rs` parses arguments and sets up logging; everything
//! it runs lives here so tests can drive whole runs against temporary files.

pub mod artifact;
pub mod commands;
pub mod config;
pub mod error;

pub use artifact::*;
pub use commands::*;
pub use config::*;
pub use error::*;
