//! One-dimensional binned histogram
//!
//! Bins are addressed with the usual 1-based convention: bin `0` is the
//! underflow, bins `1..=n` are the regular bins and bin `n + 1` is the
//! overflow. Range sums (`integral`) include both ends.
//!
//! A [`Cumulative`] snapshot turns range sums into O(1) lookups so that a
//! full cut scan over `n` bins stays O(n).

use crate::error::{CutScanError, CutScanResult};
use serde::{Deserialize, Serialize};

/// Fixed binning over a numeric axis with per-bin counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Histogram name (used in error messages and output labels)
    name: String,
    /// Title of the x axis
    x_title: String,
    /// Bin edges, `nbins + 1` strictly increasing values
    edges: Vec<f64>,
    /// Counts including underflow (index 0) and overflow (index nbins + 1)
    counts: Vec<f64>,
}

impl Histogram {
    /// Create a histogram with `nbins` equal-width bins over `[low, high)`
    pub fn uniform(name: impl Into<String>, nbins: usize, low: f64, high: f64) -> CutScanResult<Self> {
        if nbins == 0 {
            return Err(CutScanError::InvalidBinning(
                "at least one bin is required".to_string(),
            ));
        }
        if !low.is_finite() || !high.is_finite() || low >= high {
            return Err(CutScanError::InvalidBinning(format!(
                "range [{}, {}) is empty or not finite",
                low, high
            )));
        }

        let width = (high - low) / nbins as f64;
        let mut edges: Vec<f64> = (0..nbins).map(|i| low + i as f64 * width).collect();
        edges.push(high);

        Ok(Self {
            name: name.into(),
            x_title: String::new(),
            edges,
            counts: vec![0.0; nbins + 2],
        })
    }

    /// Create a histogram from explicit (possibly variable-width) bin edges
    pub fn with_edges(name: impl Into<String>, edges: Vec<f64>) -> CutScanResult<Self> {
        if edges.len() < 2 {
            return Err(CutScanError::InvalidBinning(
                "at least two edges are required".to_string(),
            ));
        }
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(CutScanError::InvalidBinning(
                "edges must be finite".to_string(),
            ));
        }
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(CutScanError::InvalidBinning(
                "edges must be strictly increasing".to_string(),
            ));
        }

        let nbins = edges.len() - 1;
        Ok(Self {
            name: name.into(),
            x_title: String::new(),
            edges,
            counts: vec![0.0; nbins + 2],
        })
    }

    /// Create an equal-width histogram whose regular bins hold `counts`
    pub fn from_counts(
        name: impl Into<String>,
        low: f64,
        high: f64,
        counts: &[f64],
    ) -> CutScanResult<Self> {
        let mut hist = Self::uniform(name, counts.len(), low, high)?;
        hist.counts[1..=counts.len()].copy_from_slice(counts);
        Ok(hist)
    }

    /// Set the x-axis title
    pub fn with_x_title(mut self, title: impl Into<String>) -> Self {
        self.x_title = title.into();
        self
    }

    /// Histogram name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// X-axis title
    pub fn x_title(&self) -> &str {
        &self.x_title
    }

    /// Number of regular bins
    pub fn nbins(&self) -> usize {
        self.edges.len() - 1
    }

    /// All bin edges (`nbins + 1` values)
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Bin index for a value: 0 for underflow, `nbins + 1` for overflow
    pub fn find_bin(&self, x: f64) -> usize {
        self.edges.partition_point(|&e| e <= x)
    }

    /// Add one entry at `x`
    ///
    /// Returns `false` (and records nothing) for NaN or infinite values.
    pub fn fill(&mut self, x: f64) -> bool {
        self.fill_weighted(x, 1.0)
    }

    /// Add an entry with weight `w` at `x`
    pub fn fill_weighted(&mut self, x: f64, w: f64) -> bool {
        if !x.is_finite() {
            return false;
        }
        let bin = self.find_bin(x);
        self.counts[bin] += w;
        true
    }

    /// Count in bin `bin` (0 = underflow, `nbins + 1` = overflow)
    ///
    /// Out-of-range indices read as an empty bin.
    pub fn bin_content(&self, bin: usize) -> f64 {
        self.counts.get(bin).copied().unwrap_or(0.0)
    }

    /// Overwrite the count in bin `bin`; out-of-range indices are ignored
    pub fn set_bin_content(&mut self, bin: usize, content: f64) {
        if let Some(slot) = self.counts.get_mut(bin) {
            *slot = content;
        }
    }

    /// Lower edge of regular bin `bin` (`1..=nbins`)
    ///
    /// # Panics
    ///
    /// Panics if `bin` is 0 or greater than `nbins`.
    pub fn bin_low_edge(&self, bin: usize) -> f64 {
        self.edges[bin - 1]
    }

    /// Upper edge of regular bin `bin` (`1..=nbins`)
    ///
    /// # Panics
    ///
    /// Panics if `bin` is greater than `nbins`.
    pub fn bin_up_edge(&self, bin: usize) -> f64 {
        self.edges[bin]
    }

    /// Width of regular bin `bin` (`1..=nbins`)
    ///
    /// # Panics
    ///
    /// Panics if `bin` is 0 or greater than `nbins`.
    pub fn bin_width(&self, bin: usize) -> f64 {
        self.edges[bin] - self.edges[bin - 1]
    }

    /// Center of regular bin `bin` (`1..=nbins`)
    ///
    /// # Panics
    ///
    /// Panics if `bin` is 0 or greater than `nbins`.
    pub fn bin_center(&self, bin: usize) -> f64 {
        self.bin_low_edge(bin) + 0.5 * self.bin_width(bin)
    }

    /// Sum of counts over bins `[lo, hi]`, both inclusive
    ///
    /// `hi` is clamped to the overflow bin; an empty range sums to zero.
    /// This is a direct O(n) sum; use [`Histogram::cumulative`] for scans.
    pub fn integral(&self, lo: usize, hi: usize) -> f64 {
        let hi = hi.min(self.nbins() + 1);
        if lo > hi {
            return 0.0;
        }
        self.counts[lo..=hi].iter().sum()
    }

    /// Total count including underflow and overflow
    pub fn total(&self) -> f64 {
        self.integral(0, self.nbins() + 1)
    }

    /// Raw counts including underflow and overflow
    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    /// Build prefix/suffix sums for O(1) range queries
    pub fn cumulative(&self) -> Cumulative {
        Cumulative::new(&self.counts)
    }
}

/// Prefix and suffix sums over a histogram's counts
///
/// Tail ranges (`[lo, nbins + 1]`) are answered from the suffix sums, which
/// accumulate from the overflow end, and head ranges from the prefix sums.
/// For integer counts both are exact and match a direct sum bit for bit.
#[derive(Debug, Clone, PartialEq)]
pub struct Cumulative {
    /// `prefix[j]` = sum of counts[0..j]
    prefix: Vec<f64>,
    /// `suffix[j]` = sum of counts[j..]
    suffix: Vec<f64>,
}

impl Cumulative {
    fn new(counts: &[f64]) -> Self {
        let len = counts.len();

        let mut prefix = Vec::with_capacity(len + 1);
        prefix.push(0.0);
        let mut running = 0.0;
        for &c in counts {
            running += c;
            prefix.push(running);
        }

        let mut suffix = vec![0.0; len + 1];
        for j in (0..len).rev() {
            suffix[j] = suffix[j + 1] + counts[j];
        }

        Self { prefix, suffix }
    }

    /// Index of the overflow bin
    fn overflow(&self) -> usize {
        self.prefix.len() - 2
    }

    /// Sum of counts over bins `[lo, hi]`, both inclusive
    pub fn integral(&self, lo: usize, hi: usize) -> f64 {
        let hi = hi.min(self.overflow());
        if lo > hi {
            return 0.0;
        }
        if hi == self.overflow() {
            self.suffix[lo]
        } else {
            self.prefix[hi + 1] - self.prefix[lo]
        }
    }

    /// Total count including underflow and overflow
    pub fn total(&self) -> f64 {
        self.suffix[0]
    }
}
