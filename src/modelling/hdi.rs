//! modelling::hdi — highest-density credible intervals on the Rt grid.
//!
//! Purpose
//! -------
//! Extract the narrowest contiguous range of Rt grid values carrying more
//! than a target share `p` of a posterior's probability mass.
//!
//! Key behaviors
//! -------------
//! - With C the cumulative sum of the pmf and C₋₁ = 0, the mass on grid
//!   indices i..=j is C[j] − C[i−1]. Among all pairs with mass strictly
//!   greater than `p`, the pair minimizing j − i is selected; ties go to the
//!   smallest i, i.e. the first pair under ascending enumeration of (i, j).
//! - The reported bounds are the grid values at i and j, so a pmf
//!   concentrated on a single index m yields (rₘ, rₘ).
//!
//! Conventions
//! -----------
//! - Search is a two-pointer sweep, O(k) in the grid length. For each i the
//!   smallest qualifying j is non-decreasing in i because C is
//!   non-decreasing, so the right pointer never moves back. For
//!   non-negative pmfs this selects exactly the pair the O(k²) enumeration
//!   selects; the unit tests cross-check both.
//! - A pmf with NaN entries, or with total mass ≤ `p`, has no qualifying
//!   pair and is reported as [`RtError::IntervalNotFound`].
//!
//! Testing notes
//! -------------
//! - Point masses, Gaussian-shaped pmfs, monotonicity in `p`, rejection of
//!   2-D input and agreement with a brute-force search.

use crate::modelling::{
    errors::{RtError, RtResult},
    grid::{grid_len, rt_range},
    validation::{squeeze_to_1d, validate_confidence},
};
use ndarray::{ArrayBase, ArrayView1, Data, Dimension};

/// Highest-density interval of a posterior pmf over the Rt grid.
///
/// Parameters
/// ----------
/// - `pmf`: `&ArrayBase<S, D>`
///   Probability mass vector aligned with [`rt_range`]. Any array that
///   squeezes to one dimension of length `grid_len()` is accepted.
/// - `p`: `f64`
///   Target credible level in (0, 1), typically 0.9.
///
/// Returns
/// -------
/// `RtResult<(f64, f64)>`
///   `(low, high)` grid values bounding the interval, `low <= high`.
///
/// Errors
/// ------
/// - `RtError::InvalidShape` if `pmf` is not one-dimensional after squeezing.
/// - `RtError::GridLengthMismatch` if its length differs from the grid.
/// - `RtError::InvalidConfidence` if `p` is outside (0, 1).
/// - `RtError::IntervalNotFound` if no range holds more than `p` of the mass.
pub fn high_density_interval<S, D>(pmf: &ArrayBase<S, D>, p: f64) -> RtResult<(f64, f64)>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let pmf = squeeze_to_1d(pmf)?;
    if pmf.len() != grid_len() {
        return Err(RtError::GridLengthMismatch { expected: grid_len(), found: pmf.len() });
    }
    validate_confidence(p)?;

    let (low, high) = narrowest_range(&pmf, p).ok_or(RtError::IntervalNotFound { p })?;
    let grid = rt_range();
    Ok((grid[low], grid[high]))
}

/// Index pair `(i, j)` of the narrowest range `i..=j` with mass above `p`.
pub(crate) fn narrowest_range(pmf: &ArrayView1<'_, f64>, p: f64) -> Option<(usize, usize)> {
    let cumsum = cumulative_sum(pmf);
    let k = cumsum.len();

    let mut best: Option<(usize, usize)> = None;
    let mut j = 0;
    for i in 0..k {
        let base = if i == 0 { 0.0 } else { cumsum[i - 1] };
        j = j.max(i);
        while j < k && !(cumsum[j] - base > p) {
            j += 1;
        }
        if j == k {
            // Later starts only lose mass.
            break;
        }
        match best {
            Some((low, high)) if high - low <= j - i => {}
            _ => best = Some((i, j)),
        }
    }
    best
}

fn cumulative_sum(pmf: &ArrayView1<'_, f64>) -> Vec<f64> {
    pmf.iter()
        .scan(0.0, |acc, &mass| {
            *acc += mass;
            Some(*acc)
        })
        .collect()
}
