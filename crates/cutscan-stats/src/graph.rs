//! Curve output type
//!
//! A [`Graph`] is what every curve builder returns: ordered points with
//! optional asymmetric errors, axis titles, a title and optional display
//! ranges. Drawing is left to whatever consumes the serialized form.

use serde::{Deserialize, Serialize};

/// Asymmetric error bars around a point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AsymmetricErrors {
    pub x_low: f64,
    pub x_high: f64,
    pub y_low: f64,
    pub y_high: f64,
}

/// A single curve point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphPoint {
    pub x: f64,
    pub y: f64,
    /// Error bars, present only for measured efficiencies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<AsymmetricErrors>,
}

impl GraphPoint {
    /// A point without error bars
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, errors: None }
    }

    /// A point with asymmetric error bars
    pub fn with_errors(x: f64, y: f64, errors: AsymmetricErrors) -> Self {
        Self {
            x,
            y,
            errors: Some(errors),
        }
    }
}

/// Closed display range for one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// The [0, 1] range used for efficiency axes
    pub fn unit() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Check whether a value lies inside the range
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// An ordered curve with plotting metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub points: Vec<GraphPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_range: Option<AxisRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_range: Option<AxisRange>,
}

impl Graph {
    /// Create an untitled graph from points
    pub fn new(points: Vec<GraphPoint>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set both axis titles
    pub fn with_axis_titles(mut self, x_title: impl Into<String>, y_title: impl Into<String>) -> Self {
        self.x_title = x_title.into();
        self.y_title = y_title.into();
        self
    }

    /// Set the x display range
    pub fn with_x_range(mut self, range: AxisRange) -> Self {
        self.x_range = Some(range);
        self
    }

    /// Set the y display range
    pub fn with_y_range(mut self, range: AxisRange) -> Self {
        self.y_range = Some(range);
        self
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the graph has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// X values in order
    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    /// Y values in order
    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    /// (x, y) pairs for plotting
    pub fn plot_points(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.x, p.y)).collect()
    }

    /// Whether any point carries error bars
    pub fn has_errors(&self) -> bool {
        self.points.iter().any(|p| p.errors.is_some())
    }
}
