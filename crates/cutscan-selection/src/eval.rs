//! Expression evaluation for selection
//!
//! Evaluates selection expressions against the rows of a column table.

use crate::ast::*;
use std::collections::HashMap;
use thiserror::Error;

/// Evaluation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Column not found: {0}")]
    FieldNotFound(String),

    #[error("Row {index} out of range ({rows} rows)")]
    RowOutOfRange { index: usize, rows: usize },
}

/// Result type for evaluation
pub type EvalResult<T> = Result<T, EvalError>;

/// Context for evaluation - provides column values
pub trait EvalContext {
    /// Get the value of a column at a row index
    fn field_value(&self, field: &str, index: usize) -> Option<f64>;

    /// Check whether a column exists at all
    fn has_field(&self, field: &str) -> bool;

    /// Get the number of rows
    fn num_rows(&self) -> usize;
}

/// A single row of named values
impl EvalContext for HashMap<String, f64> {
    fn field_value(&self, field: &str, index: usize) -> Option<f64> {
        if index == 0 {
            self.get(field).copied()
        } else {
            None
        }
    }

    fn has_field(&self, field: &str) -> bool {
        self.contains_key(field)
    }

    fn num_rows(&self) -> usize {
        1
    }
}

/// Evaluator for selection expressions
pub struct Evaluator<'a, C: EvalContext> {
    context: &'a C,
}

impl<'a, C: EvalContext> Evaluator<'a, C> {
    /// Create a new evaluator
    pub fn new(context: &'a C) -> Self {
        Self { context }
    }

    /// Check up front that every column the expression reads exists
    pub fn check_columns(&self, expr: &SelectionExpr) -> EvalResult<()> {
        match expr.columns().into_iter().find(|c| !self.context.has_field(c)) {
            Some(missing) => Err(EvalError::FieldNotFound(missing)),
            None => Ok(()),
        }
    }

    /// Evaluate an expression, returning a selection mask
    pub fn evaluate(&self, expr: &SelectionExpr) -> EvalResult<Vec<bool>> {
        self.check_columns(expr)?;
        (0..self.context.num_rows())
            .map(|i| self.evaluate_at(expr, i))
            .collect()
    }

    /// Evaluate an expression at a single row index
    pub fn evaluate_at(&self, expr: &SelectionExpr, index: usize) -> EvalResult<bool> {
        let rows = self.context.num_rows();
        if index >= rows {
            return Err(EvalError::RowOutOfRange { index, rows });
        }
        self.evaluate_row(expr, index)
    }

    fn evaluate_row(&self, expr: &SelectionExpr, index: usize) -> EvalResult<bool> {
        match expr {
            SelectionExpr::All => Ok(true),
            SelectionExpr::None => Ok(false),

            SelectionExpr::And(left, right) => {
                Ok(self.evaluate_row(left, index)? && self.evaluate_row(right, index)?)
            }

            SelectionExpr::Or(left, right) => {
                Ok(self.evaluate_row(left, index)? || self.evaluate_row(right, index)?)
            }

            SelectionExpr::Not(inner) => Ok(!self.evaluate_row(inner, index)?),

            SelectionExpr::Comparison(cmp) => self.evaluate_comparison(cmp, index),
        }
    }

    /// Evaluate a comparison predicate
    fn evaluate_comparison(&self, cmp: &Comparison, index: usize) -> EvalResult<bool> {
        let lhs = self.evaluate_value(&cmp.lhs, index)?;
        let rhs = self.evaluate_value(&cmp.rhs, index)?;
        Ok(cmp.op.evaluate(lhs, rhs))
    }

    /// Evaluate a value
    fn evaluate_value(&self, value: &Value, index: usize) -> EvalResult<f64> {
        match value {
            Value::Number(n) => Ok(*n),

            Value::Field(name) => self
                .context
                .field_value(name, index)
                .ok_or_else(|| EvalError::FieldNotFound(name.clone())),
        }
    }
}
