//! modelling::grid — process-wide constants of the systrom model.
//!
//! The Rt grid is built once on first use and shared read-only by every
//! computation afterwards; nothing in the crate mutates it.

use ndarray::{Array1, ArrayView1};
use std::sync::LazyLock;

/// Reciprocal of the serial interval (7 days) used by the Poisson likelihood.
pub const GAMMA: f64 = 1.0 / 7.0;

/// Largest candidate reproduction number.
pub const RT_MAX: f64 = 12.0;

/// Number of intervals between 0 and [`RT_MAX`]; the grid has one more point.
pub const RT_RESOLUTION: usize = 1200;

/// Spacing between consecutive grid values (0.01).
pub const RT_STEP: f64 = RT_MAX / RT_RESOLUTION as f64;

/// Candidate Rt values `0, 0.01, …, 12`.
pub static RT_RANGE: LazyLock<Array1<f64>> =
    LazyLock::new(|| Array1::linspace(0.0, RT_MAX, RT_RESOLUTION + 1));

/// Borrow the Rt grid.
pub fn rt_range() -> ArrayView1<'static, f64> {
    RT_RANGE.view()
}

/// Number of points on the Rt grid.
pub fn grid_len() -> usize {
    RT_RESOLUTION + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rt_range_spans_zero_to_rt_max_with_fixed_step() {
        let grid = rt_range();

        assert_eq!(grid.len(), grid_len());
        assert_eq!(grid[0], 0.0);
        assert_abs_diff_eq!(grid[grid.len() - 1], RT_MAX, epsilon = 1e-12);
        for pair in grid.windows(2) {
            assert_abs_diff_eq!(pair[1] - pair[0], RT_STEP, epsilon = 1e-9);
        }
    }
}
