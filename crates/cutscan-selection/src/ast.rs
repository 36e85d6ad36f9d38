//! Abstract Syntax Tree for selection expressions

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A selection expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectionExpr {
    /// Logical AND of two expressions
    And(Box<SelectionExpr>, Box<SelectionExpr>),

    /// Logical OR of two expressions
    Or(Box<SelectionExpr>, Box<SelectionExpr>),

    /// Logical NOT of an expression
    Not(Box<SelectionExpr>),

    /// A comparison predicate
    Comparison(Comparison),

    /// All rows (constant true)
    All,

    /// No rows (constant false)
    None,
}

impl SelectionExpr {
    /// Create an AND expression
    pub fn and(left: SelectionExpr, right: SelectionExpr) -> Self {
        SelectionExpr::And(Box::new(left), Box::new(right))
    }

    /// Create an OR expression
    pub fn or(left: SelectionExpr, right: SelectionExpr) -> Self {
        SelectionExpr::Or(Box::new(left), Box::new(right))
    }

    /// Create a NOT expression
    pub fn not(expr: SelectionExpr) -> Self {
        SelectionExpr::Not(Box::new(expr))
    }

    /// Check if this is an atomic expression (no operators)
    pub fn is_atomic(&self) -> bool {
        matches!(
            self,
            SelectionExpr::Comparison(_) | SelectionExpr::All | SelectionExpr::None
        )
    }

    /// Names of every column the expression reads, sorted
    pub fn columns(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns(&self, out: &mut BTreeSet<String>) {
        match self {
            SelectionExpr::And(left, right) | SelectionExpr::Or(left, right) => {
                left.collect_columns(out);
                right.collect_columns(out);
            }
            SelectionExpr::Not(inner) => inner.collect_columns(out),
            SelectionExpr::Comparison(cmp) => {
                for value in [&cmp.lhs, &cmp.rhs] {
                    if let Value::Field(name) = value {
                        out.insert(name.clone());
                    }
                }
            }
            SelectionExpr::All | SelectionExpr::None => {}
        }
    }
}

impl fmt::Display for SelectionExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionExpr::And(left, right) => write!(f, "({} && {})", left, right),
            SelectionExpr::Or(left, right) => write!(f, "({} || {})", left, right),
            SelectionExpr::Not(inner) => write!(f, "!{}", inner),
            SelectionExpr::Comparison(cmp) => {
                write!(f, "{} {} {}", cmp.lhs, cmp.op.as_str(), cmp.rhs)
            }
            SelectionExpr::All => write!(f, "all"),
            SelectionExpr::None => write!(f, "none"),
        }
    }
}

/// A comparison predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Left-hand side (usually a column name)
    pub lhs: Value,
    /// Comparison operator
    pub op: ComparisonOp,
    /// Right-hand side (usually a literal)
    pub rhs: Value,
}

impl Comparison {
    /// Create a new comparison
    pub fn new(lhs: Value, op: ComparisonOp, rhs: Value) -> Self {
        Self { lhs, op, rhs }
    }

    /// Create a field > value comparison
    pub fn field_gt(field: &str, value: f64) -> Self {
        Self::new(
            Value::Field(field.to_string()),
            ComparisonOp::Gt,
            Value::Number(value),
        )
    }

    /// Create a field < value comparison
    pub fn field_lt(field: &str, value: f64) -> Self {
        Self::new(
            Value::Field(field.to_string()),
            ComparisonOp::Lt,
            Value::Number(value),
        )
    }

    /// Create a field == value comparison
    pub fn field_eq(field: &str, value: f64) -> Self {
        Self::new(
            Value::Field(field.to_string()),
            ComparisonOp::Eq,
            Value::Number(value),
        )
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Le,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (==)
    Eq,
    /// Not equal (!=)
    Ne,
}

impl ComparisonOp {
    /// Evaluate the comparison for two f64 values
    ///
    /// Equality is exact IEEE comparison, so `NaN == NaN` is false and
    /// `NaN != x` is true.
    pub fn evaluate(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            ComparisonOp::Lt => lhs < rhs,
            ComparisonOp::Le => lhs <= rhs,
            ComparisonOp::Gt => lhs > rhs,
            ComparisonOp::Ge => lhs >= rhs,
            ComparisonOp::Eq => lhs == rhs,
            ComparisonOp::Ne => lhs != rhs,
        }
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Eq => "==",
            ComparisonOp::Ne => "!=",
        }
    }
}

/// An operand of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A column reference
    Field(String),
    /// A numeric literal
    Number(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Field(name) => write!(f, "{}", name),
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}
