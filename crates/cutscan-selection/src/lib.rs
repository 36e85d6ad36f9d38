//! cutscan-selection - Event selection expressions
//!
//! Selections are boolean predicates over the numeric columns of an
//! evaluation table. They decide which rows are filled into a histogram.
//!
//! # Expression Syntax
//!
//! - **Comparisons**: `trigger > 0`, `nHits <= 12`, `1 == 1`
//! - **Logic**: `(a > 0 || b > 0) && !veto == 1`
//! - **Constants**: `all`, `none` (an empty expression selects everything)
//!
//! # Examples
//!
//! ```
//! use cutscan_selection::{parse_selection, SelectionExpr};
//!
//! let expr = parse_selection("trigger > 0 && recoilPT < 100")?;
//! assert!(matches!(expr, SelectionExpr::And(_, _)));
//! assert_eq!(parse_selection("")?, SelectionExpr::All);
//! # Ok::<(), cutscan_selection::ParseError>(())
//! ```

pub mod ast;
pub mod eval;
pub mod parser;

pub use ast::*;
pub use eval::*;
pub use parser::*;
