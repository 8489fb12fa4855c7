//! modelling::systrom — sequential Bayesian filter over the Rt grid.
//!
//! Purpose
//! -------
//! Turn a series of daily new-case counts into one posterior distribution
//! over candidate reproduction numbers per day, together with the model's
//! total log-likelihood. This is a discrete-state recursive Bayes filter:
//! a Gaussian random walk predicts today's Rt from yesterday's posterior and
//! a Poisson observation model updates it with today's count.
//!
//! Key behaviors
//! -------------
//! - Likelihood: for consecutive counts (kₜ₋₁, kₜ) and grid value r the
//!   expected count is λ = kₜ₋₁ · exp(γ (r − 1)), γ = 1/7, and the likelihood
//!   is the Poisson mass of kₜ under λ. Each column (fixed t) is normalized
//!   across the grid; this stands in for the proper normalization constant
//!   of the model and is an accepted approximation.
//! - Transition: Tᵢⱼ ∝ φ((rᵢ − rⱼ) / σ), each column (source rⱼ) normalized
//!   to one.
//! - Recursion: prior = T · posteriorₜ₋₁, numerator = likelihoodₜ ⊙ prior,
//!   Zₜ = Σ numerator, posteriorₜ = numerator / Zₜ, ℓ += ln Zₜ.
//!
//! Invariants & assumptions
//! ------------------------
//! - Input is squeezed to 1-D and validated (length ≥ 2, counts finite and
//!   non-negative, σ finite and positive) before any numeric work.
//! - Row 0 of the posterior matrix is the uniform prior.
//! - A zero (or subnormal) Zₜ is NOT clamped. The division produces NaN/Inf,
//!   which then propagates through every later row and the log-likelihood.
//!   This flags an anomaly in the input, typically a zero case count
//!   followed by a positive one, that must be handled upstream.
//!
//! Conventions
//! -----------
//! - Counts may be real-valued (smoothed). The Poisson mass is evaluated as
//!   exp(k ln λ − λ − ln Γ(k + 1)), which coincides with the usual pmf for
//!   integer k. λ = 0 puts all mass on k = 0.
//! - Likelihood columns are normalized in log space (shift by the column
//!   maximum) so that large counts do not underflow to an all-zero column.
//! - The transition kernel depends only on |i − j| and is evaluated once per
//!   lag.
//!
//! Testing notes
//! -------------
//! - Unit tests compare the likelihood against `statrs::distribution::Poisson`
//!   for integer counts, check column normalization of the transition,
//!   shape/row-sum guarantees of the posterior matrix, NaN propagation on a
//!   zero count and recovery of a known constant growth rate.

use crate::modelling::{
    errors::{RtError, RtResult},
    grid::{GAMMA, RT_STEP, grid_len, rt_range},
    validation::{squeeze_counts, validate_sigma},
};
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayViewMut1, Data, Dimension};
use statrs::{
    distribution::{Continuous, Normal},
    function::gamma::ln_gamma,
};

/// Posteriors — output of one filter run.
///
/// Fields
/// ------
/// - `probabilities`: `Array2<f64>`
///   `n × grid_len()` matrix, one posterior pmf per time step. Row 0 is the
///   uniform prior; columns follow [`rt_range`].
/// - `log_likelihood`: `f64`
///   Σₜ ln Zₜ over t = 1, …, n − 1. Only meaningful relative to other runs on
///   the same data (e.g. when comparing σ candidates).
///
/// Invariants
/// ----------
/// - Each row sums to one within floating-point tolerance unless a
///   degenerate step occurred, in which case that row and all later rows
///   are non-finite and `log_likelihood` is non-finite too.
#[derive(Debug, Clone, PartialEq)]
pub struct Posteriors {
    pub probabilities: Array2<f64>,
    pub log_likelihood: f64,
}

impl Posteriors {
    /// Number of time steps (rows).
    pub fn len(&self) -> usize {
        self.probabilities.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.nrows() == 0
    }
}

/// Run the sequential Bayesian filter on a series of new cases.
///
/// Parameters
/// ----------
/// - `series`: `&ArrayBase<S, D>`
///   New cases per time step. Any array that squeezes to one dimension is
///   accepted (e.g. shape `(n,)`, `(n, 1)` or `(1, n)`).
/// - `sigma`: `f64`
///   Standard deviation of the Gaussian random walk on Rt.
///
/// Returns
/// -------
/// `RtResult<Posteriors>`
///   Posterior matrix with one row per input point and the total
///   log-likelihood.
///
/// Errors
/// ------
/// - `RtError::InvalidShape` if `series` is not one-dimensional after
///   squeezing.
/// - `RtError::InsufficientData` if fewer than two points are given.
/// - `RtError::InvalidCount` for negative or non-finite counts.
/// - `RtError::InvalidSigma` if `sigma` is not finite and positive.
///
/// Notes
/// -----
/// - A zero count followed by a positive one makes every likelihood entry
///   vanish; the resulting NaN rows are returned as-is.
///
/// Examples
/// --------
/// ```rust
/// use ndarray::array;
/// use opendemic::modelling::{get_posteriors, grid::grid_len};
///
/// let posteriors = get_posteriors(&array![100.0, 120.0, 150.0, 180.0], 0.25)?;
/// assert_eq!(posteriors.probabilities.dim(), (4, grid_len()));
/// assert!(posteriors.log_likelihood.is_finite());
/// # Ok::<(), opendemic::modelling::RtError>(())
/// ```
pub fn get_posteriors<S, D>(series: &ArrayBase<S, D>, sigma: f64) -> RtResult<Posteriors>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let counts = squeeze_counts(series)?;
    validate_sigma(sigma)?;

    let transition = transition_matrix(sigma)?;
    Ok(run_filter(&counts, &transition))
}

//
// ---------- Crate-internal building blocks ----------
//

/// Column-stochastic random-walk transition over the Rt grid.
///
/// Entry `(i, j)` is the probability of moving from `r_j` to `r_i`. Shared
/// with the sigma search, which reuses one matrix for every region.
pub(crate) fn transition_matrix(sigma: f64) -> RtResult<Array2<f64>> {
    let normal = Normal::new(0.0, sigma).map_err(|_| RtError::InvalidSigma { value: sigma })?;
    let k = grid_len();
    let kernel: Array1<f64> = (0..k).map(|lag| normal.pdf(lag as f64 * RT_STEP)).collect();

    let mut transition = Array2::from_shape_fn((k, k), |(i, j)| kernel[i.abs_diff(j)]);
    for mut column in transition.columns_mut() {
        let total = column.sum();
        column /= total;
    }
    Ok(transition)
}

/// Normalized Poisson likelihood, one column per transition `t-1 → t`.
///
/// Shape is `grid_len() × (n − 1)`.
pub(crate) fn likelihood_matrix(counts: &ArrayView1<'_, f64>) -> Array2<f64> {
    let grid = rt_range();
    let steps = counts.len().saturating_sub(1);
    let mut likelihood = Array2::zeros((grid.len(), steps));

    for (t, mut column) in likelihood.columns_mut().into_iter().enumerate() {
        let (previous, current) = (counts[t], counts[t + 1]);
        let ln_factorial = ln_gamma(current + 1.0);
        for (cell, &r) in column.iter_mut().zip(grid.iter()) {
            let lam = previous * (GAMMA * (r - 1.0)).exp();
            *cell = poisson_ln_pmf(current, lam, ln_factorial);
        }
        exp_normalize(&mut column);
    }
    likelihood
}

/// Forward pass given validated counts and a prebuilt transition matrix.
pub(crate) fn run_filter(counts: &ArrayView1<'_, f64>, transition: &Array2<f64>) -> Posteriors {
    let n = counts.len();
    let k = grid_len();
    let likelihood = likelihood_matrix(counts);

    let mut probabilities = Array2::zeros((n, k));
    let uniform = Array1::from_elem(k, 1.0);
    probabilities.row_mut(0).assign(&(&uniform / uniform.sum()));

    let mut log_likelihood = 0.0;
    for t in 1..n {
        // Predict, then weight by the likelihood of today's count.
        let prior = transition.dot(&probabilities.row(t - 1));
        let numerator = &likelihood.column(t - 1) * &prior;
        let evidence = numerator.sum();

        probabilities.row_mut(t).assign(&(numerator / evidence));
        log_likelihood += evidence.ln();
    }

    Posteriors { probabilities, log_likelihood }
}

//
// ---------- Private helpers ----------
//

/// ln P(K = k | λ) for real-valued k ≥ 0; `ln_factorial` is ln Γ(k + 1).
#[inline]
fn poisson_ln_pmf(k: f64, lam: f64, ln_factorial: f64) -> f64 {
    if lam == 0.0 {
        return if k == 0.0 { 0.0 } else { f64::NEG_INFINITY };
    }
    k * lam.ln() - lam - ln_factorial
}

/// Replace log-masses by masses that sum to one.
///
/// A column without any finite entry becomes NaN.
fn exp_normalize(column: &mut ArrayViewMut1<'_, f64>) {
    let max = column.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
    column.mapv_inplace(|v| (v - max).exp());
    let total = column.sum();
    *column /= total;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ndarray::{Axis, array};
    use statrs::distribution::{Discrete, Poisson};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Input guards of `get_posteriors` (shape, length, sigma).
    // - Likelihood and transition construction.
    // - Output shape, normalization and NaN propagation of the filter.
    // - Recovery of a known growth rate.
    //
    // They intentionally DO NOT cover:
    // - Credible intervals and point estimates (see `hdi` and `rt`).
    // -------------------------------------------------------------------------

    fn argmax(row: ArrayView1<'_, f64>) -> usize {
        let mut best = 0;
        for (i, &v) in row.iter().enumerate() {
            if v > row[best] {
                best = i;
            }
        }
        best
    }

    #[test]
    // Purpose
    // -------
    // End-to-end shape and normalization guarantees on a short series.
    //
    // Given
    // -----
    // - Series `[100, 120, 150, 180]`, sigma = 0.25.
    //
    // Expect
    // ------
    // - Matrix of shape (4, 1201).
    // - Every row sums to 1 within 1e-6.
    // - Finite log-likelihood.
    fn get_posteriors_returns_normalized_rows() {
        // Arrange
        let series = array![100.0, 120.0, 150.0, 180.0];

        // Act
        let posteriors = get_posteriors(&series, 0.25).expect("valid series should succeed");

        // Assert
        assert_eq!(posteriors.probabilities.dim(), (4, 1201));
        assert_eq!(posteriors.len(), 4);
        for row in posteriors.probabilities.axis_iter(Axis(0)) {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-6);
        }
        assert!(posteriors.log_likelihood.is_finite());
    }

    #[test]
    fn first_row_is_uniform_prior() {
        let posteriors = get_posteriors(&array![10.0, 12.0], 0.25).unwrap();

        let first = posteriors.probabilities.row(0);
        for &v in first.iter() {
            assert_relative_eq!(v, 1.0 / 1201.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn get_posteriors_rejects_two_dimensional_input() {
        let matrix = array![[1.0, 2.0], [3.0, 4.0]];

        let result = get_posteriors(&matrix, 0.25);

        assert_eq!(result.unwrap_err(), RtError::InvalidShape { ndim: 2 });
    }

    #[test]
    fn get_posteriors_accepts_column_vector() {
        let column = array![[100.0], [110.0], [121.0]];

        let posteriors = get_posteriors(&column, 0.25).unwrap();

        assert_eq!(posteriors.len(), 3);
    }

    #[test]
    fn get_posteriors_rejects_invalid_sigma() {
        let result = get_posteriors(&array![10.0, 12.0], -1.0);

        assert_eq!(result.unwrap_err(), RtError::InvalidSigma { value: -1.0 });
    }

    #[test]
    // Purpose
    // -------
    // For integer counts the normalized likelihood must equal the
    // column-normalized Poisson pmf from statrs.
    //
    // Given
    // -----
    // - Counts `[20, 25]`.
    //
    // Expect
    // ------
    // - For every grid value r, likelihood[r] equals
    //   Poisson(20·exp(γ(r−1))).pmf(25) divided by the column sum.
    fn likelihood_matches_statrs_poisson_for_integer_counts() {
        // Arrange
        let counts = array![20.0, 25.0];
        let grid = rt_range();
        let reference: Vec<f64> = grid
            .iter()
            .map(|&r| {
                let lam = 20.0 * (GAMMA * (r - 1.0)).exp();
                Poisson::new(lam).unwrap().pmf(25)
            })
            .collect();
        let total: f64 = reference.iter().sum();

        // Act
        let likelihood = likelihood_matrix(&counts.view());

        // Assert
        assert_eq!(likelihood.dim(), (grid.len(), 1));
        for (i, expected) in reference.iter().enumerate() {
            assert_relative_eq!(
                likelihood[[i, 0]],
                expected / total,
                max_relative = 1e-8,
                epsilon = 1e-300
            );
        }
    }

    #[test]
    fn likelihood_for_zero_mean_and_zero_count_is_uniform() {
        let likelihood = likelihood_matrix(&array![0.0, 0.0].view());

        let expected = 1.0 / grid_len() as f64;
        for &v in likelihood.column(0).iter() {
            assert_relative_eq!(v, expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn likelihood_survives_large_counts() {
        // A 200x jump is beyond what Rt = 12 predicts, so every raw pmf value
        // underflows; the log-space normalization keeps the column usable.
        let likelihood = likelihood_matrix(&array![1_000.0, 200_000.0].view());

        let column = likelihood.column(0);
        assert!(column.iter().all(|v| v.is_finite()));
        assert_abs_diff_eq!(column.sum(), 1.0, epsilon = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Every source state must distribute all of its mass, and the kernel
    // must be symmetric away from the grid edges.
    fn transition_columns_sum_to_one() {
        // Act
        let transition = transition_matrix(0.25).unwrap();

        // Assert
        for column in transition.columns() {
            assert_abs_diff_eq!(column.sum(), 1.0, epsilon = 1e-9);
        }
        let centre = 600;
        assert_relative_eq!(
            transition[[centre + 10, centre]],
            transition[[centre - 10, centre]],
            max_relative = 1e-12
        );
        assert!(transition[[centre, centre]] > transition[[centre + 10, centre]]);
    }

    #[test]
    // Purpose
    // -------
    // A zero count followed by a positive one has zero likelihood under
    // every Rt. The degenerate step must surface as non-finite output.
    //
    // Given
    // -----
    // - Series `[5, 0, 7]`.
    //
    // Expect
    // ------
    // - Row 1 is finite (7 → 0 is unlikely, not impossible).
    // - Row 2 contains NaN and the log-likelihood is not finite.
    fn zero_count_propagates_non_finite_values() {
        // Arrange
        let series = array![5.0, 0.0, 7.0];

        // Act
        let posteriors = get_posteriors(&series, 0.25).unwrap();

        // Assert
        assert!(posteriors.probabilities.row(1).iter().all(|v| v.is_finite()));
        assert!(posteriors.probabilities.row(2).iter().any(|v| v.is_nan()));
        assert!(!posteriors.log_likelihood.is_finite());
    }

    #[test]
    // Purpose
    // -------
    // With counts growing exactly as Rt = 2 predicts, the final posterior
    // should peak close to 2.
    //
    // Given
    // -----
    // - kₜ = 200 · exp(γ (2 − 1) t) for t = 0..15 (real-valued counts).
    // - sigma = 0.1.
    //
    // Expect
    // ------
    // - argmax of the last row lies within [1.7, 2.3].
    fn constant_growth_is_recovered() {
        // Arrange
        let series: Array1<f64> = (0..15).map(|t| 200.0 * (GAMMA * t as f64).exp()).collect();

        // Act
        let posteriors = get_posteriors(&series, 0.1).unwrap();

        // Assert
        let last = posteriors.probabilities.row(series.len() - 1);
        let rt = rt_range()[argmax(last)];
        assert!((1.7..=2.3).contains(&rt), "expected Rt near 2, got {rt}");
    }
}
