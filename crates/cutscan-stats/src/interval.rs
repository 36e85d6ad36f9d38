//! Clopper-Pearson binomial confidence intervals
//!
//! The exact interval for `k` passes out of `n` trials at two-sided
//! coverage `level` is built from beta quantiles:
//!
//! - lower = `B⁻¹(α; k, n − k + 1)`, or 0 when `k = 0`
//! - upper = `B⁻¹(1 − α; k + 1, n − k)`, or 1 when `k = n`
//!
//! with `α = (1 − level) / 2`.

use crate::error::{CutScanError, CutScanResult};
use serde::{Deserialize, Serialize};
use statrs::function::beta::beta_reg;

/// One-sigma coverage used for efficiency error bars
pub const DEFAULT_LEVEL: f64 = 0.683;

/// Absolute precision of the beta quantile
const QUANTILE_TOLERANCE: f64 = 1e-14;

/// Bisection cap; [0, 1] halves below the tolerance well before this
const MAX_BISECTIONS: usize = 200;

/// Which end of the interval to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bound {
    Lower,
    Upper,
}

/// Clopper-Pearson bound for `passed` out of `total` at coverage `level`
pub fn clopper_pearson(total: u32, passed: u32, level: f64, bound: Bound) -> CutScanResult<f64> {
    if passed > total {
        return Err(CutScanError::InvalidCounts { passed, total });
    }
    if !(level > 0.0 && level < 1.0) {
        return Err(CutScanError::InvalidLevel(level));
    }

    let alpha = (1.0 - level) / 2.0;
    let k = passed as f64;
    let n = total as f64;

    let value = match bound {
        Bound::Upper if passed == total => 1.0,
        Bound::Upper => beta_quantile(1.0 - alpha, k + 1.0, n - k),
        Bound::Lower if passed == 0 => 0.0,
        Bound::Lower => beta_quantile(alpha, k, n - k + 1.0),
    };
    Ok(value)
}

/// Both Clopper-Pearson bounds as `(lower, upper)`
pub fn clopper_pearson_interval(total: u32, passed: u32, level: f64) -> CutScanResult<(f64, f64)> {
    Ok((
        clopper_pearson(total, passed, level, Bound::Lower)?,
        clopper_pearson(total, passed, level, Bound::Upper)?,
    ))
}

/// Quantile of Beta(a, b) at probability `p`
///
/// `a` and `b` must be positive. The regularized incomplete beta function
/// is monotone in `x`, so plain bisection on [0, 1] converges.
fn beta_quantile(p: f64, a: f64, b: f64) -> f64 {
    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;

    for _ in 0..MAX_BISECTIONS {
        if hi - lo < QUANTILE_TOLERANCE {
            break;
        }
        let mid = 0.5 * (lo + hi);
        if beta_reg(a, b, mid) < p {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    0.5 * (lo + hi)
}
