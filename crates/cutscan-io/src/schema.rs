//! Schema and column storage for evaluation tables

use cutscan_selection::EvalContext;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Schema describing the structure of a table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Column names in file order
    pub columns: Vec<String>,

    /// Number of records
    pub num_records: usize,
}

impl TableSchema {
    /// Create a new schema
    pub fn new(columns: Vec<String>, num_records: usize) -> Self {
        Self {
            columns,
            num_records,
        }
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Check whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}

/// Numeric columns of equal length, keyed by name
#[derive(Debug, Clone, Default)]
pub struct ColumnTable {
    columns: HashMap<String, Vec<f64>>,
    num_rows: usize,
}

impl ColumnTable {
    /// Create an empty table with a fixed row count
    pub fn new(num_rows: usize) -> Self {
        Self {
            columns: HashMap::new(),
            num_rows,
        }
    }

    /// Add a column, truncating or NaN-padding it to the table length
    pub fn add_column(&mut self, name: impl Into<String>, mut data: Vec<f64>) {
        data.resize(self.num_rows, f64::NAN);
        self.columns.insert(name.into(), data);
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(|s| s.as_str()).collect()
    }
}

impl EvalContext for ColumnTable {
    fn field_value(&self, field: &str, index: usize) -> Option<f64> {
        self.columns.get(field).and_then(|v| v.get(index).copied())
    }

    fn has_field(&self, field: &str) -> bool {
        self.columns.contains_key(field)
    }

    fn num_rows(&self) -> usize {
        self.num_rows
    }
}
