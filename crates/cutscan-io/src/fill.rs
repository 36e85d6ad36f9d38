//! Filling histograms from event tables

use crate::reader::{EventSource, IoResult};
use cutscan_selection::{Evaluator, SelectionExpr};
use cutscan_stats::Histogram;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Uniform binning of a discriminant axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Binning {
    /// Number of regular bins
    pub bins: usize,
    /// Lower edge of the first bin
    pub low: f64,
    /// Upper edge of the last bin
    pub high: f64,
}

impl Default for Binning {
    fn default() -> Self {
        Self {
            bins: 10_000,
            low: 0.0,
            high: 1.0,
        }
    }
}

impl Binning {
    /// Create a new binning
    pub fn new(bins: usize, low: f64, high: f64) -> Self {
        Self { bins, low, high }
    }

    /// An empty histogram with this binning
    pub fn histogram(&self, name: impl Into<String>) -> IoResult<Histogram> {
        Ok(Histogram::uniform(name, self.bins, self.low, self.high)?)
    }
}

/// Row accounting for one fill
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillSummary {
    /// Rows in the table
    pub rows: usize,
    /// Rows passing the selection
    pub selected: usize,
    /// Rows entered into the histogram (including under/overflow)
    pub filled: usize,
    /// Selected rows skipped for a NaN or infinite value
    pub non_finite: usize,
}

/// Fill `hist` with `column` for every row passing `selection`
pub fn fill_histogram(
    source: &dyn EventSource,
    column: &str,
    selection: &SelectionExpr,
    hist: &mut Histogram,
) -> IoResult<FillSummary> {
    let selection_columns = selection.columns();
    let mut needed: Vec<&str> = vec![column];
    needed.extend(
        selection_columns
            .iter()
            .map(String::as_str)
            .filter(|c| *c != column),
    );

    let table = source.read_columns(&needed)?;
    let mask = Evaluator::new(&table).evaluate(selection)?;

    let mut summary = FillSummary {
        rows: table.num_rows(),
        ..FillSummary::default()
    };
    if let Some(values) = table.column(column) {
        for (&value, _) in values.iter().zip(&mask).filter(|(_, keep)| **keep) {
            summary.selected += 1;
            if hist.fill(value) {
                summary.filled += 1;
            } else {
                summary.non_finite += 1;
            }
        }
    }

    if summary.non_finite > 0 {
        warn!(
            source = source.path().unwrap_or("<memory>"),
            column,
            skipped = summary.non_finite,
            "skipped non-finite values"
        );
    }
    debug!(
        hist = hist.name(),
        rows = summary.rows,
        selected = summary.selected,
        filled = summary.filled,
        "filled histogram"
    );
    Ok(summary)
}

/// Build a histogram of `column` under `selection` with the given binning
///
/// The column name becomes the histogram's x-axis title.
pub fn histogram_from_source(
    source: &dyn EventSource,
    name: &str,
    column: &str,
    selection: &SelectionExpr,
    binning: &Binning,
) -> IoResult<(Histogram, FillSummary)> {
    let mut hist = binning.histogram(name)?.with_x_title(column);
    let summary = fill_histogram(source, column, selection, &mut hist)?;
    Ok((hist, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::IoError;
    use crate::schema::{ColumnTable, TableSchema};
    use cutscan_selection::{parse_selection, EvalError};
    use rstest::rstest;

    struct MemorySource {
        table: ColumnTable,
        names: Vec<String>,
    }

    impl MemorySource {
        fn new(columns: &[(&str, Vec<f64>)]) -> Self {
            let rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
            let mut table = ColumnTable::new(rows);
            for (name, values) in columns {
                table.add_column(*name, values.clone());
            }
            Self {
                table,
                names: columns.iter().map(|(n, _)| n.to_string()).collect(),
            }
        }
    }

    impl EventSource for MemorySource {
        fn read_schema(&self) -> IoResult<TableSchema> {
            Ok(TableSchema::new(self.names.clone(), self.table.num_rows()))
        }

        fn read_columns(&self, names: &[&str]) -> IoResult<ColumnTable> {
            let mut out = ColumnTable::new(self.table.num_rows());
            for name in names {
                let values = self.table.column(name).ok_or_else(|| IoError::ColumnNotFound {
                    column: name.to_string(),
                    path: "memory".to_string(),
                })?;
                out.add_column(*name, values.to_vec());
            }
            Ok(out)
        }

        fn format_name(&self) -> &'static str {
            "memory"
        }
    }

    fn source() -> MemorySource {
        MemorySource::new(&[
            ("disc", vec![0.05, 0.55, 0.95, f64::NAN, 1.5]),
            ("trigger", vec![1.0, 0.0, 1.0, 1.0, 1.0]),
        ])
    }

    #[rstest]
    #[case("1 == 1", 5, 4)]
    #[case("trigger == 1", 4, 3)]
    #[case("trigger == 1 && disc < 0.9", 1, 1)]
    #[case("none", 0, 0)]
    fn test_fill_under_selection(
        #[case] selection: &str,
        #[case] selected: usize,
        #[case] filled: usize,
    ) {
        let expr = parse_selection(selection).unwrap();
        let (hist, summary) =
            histogram_from_source(&source(), "h", "disc", &expr, &Binning::new(10, 0.0, 1.0))
                .unwrap();

        assert_eq!(summary.rows, 5);
        assert_eq!(summary.selected, selected);
        assert_eq!(summary.filled, filled);
        assert_eq!(summary.non_finite, selected - filled);
        assert_eq!(hist.total(), filled as f64);
        assert_eq!(hist.x_title(), "disc");
    }

    #[test]
    fn test_overflow_is_kept() {
        let (hist, _) = histogram_from_source(
            &source(),
            "h",
            "disc",
            &SelectionExpr::All,
            &Binning::new(10, 0.0, 1.0),
        )
        .unwrap();
        assert_eq!(hist.bin_content(11), 1.0);
        assert_eq!(hist.bin_content(1), 1.0);
    }

    #[test]
    fn test_selection_on_missing_column() {
        let expr = parse_selection("veto == 0").unwrap();
        let result = histogram_from_source(&source(), "h", "disc", &expr, &Binning::default());
        assert!(matches!(result, Err(IoError::ColumnNotFound { .. })));
    }

    #[test]
    fn test_bad_binning() {
        let result = histogram_from_source(
            &source(),
            "h",
            "disc",
            &SelectionExpr::All,
            &Binning::new(0, 0.0, 1.0),
        );
        assert!(matches!(result, Err(IoError::Histogram(_))));
    }

    #[test]
    fn test_eval_error_converts() {
        let err: IoError = EvalError::FieldNotFound("x".to_string()).into();
        assert!(err.to_string().contains("x"));
    }

    #[test]
    fn test_default_binning() {
        let binning = Binning::default();
        assert_eq!(binning.bins, 10_000);
        assert_eq!((binning.low, binning.high), (0.0, 1.0));
    }
}
