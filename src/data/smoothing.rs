//! One-dimensional Gaussian smoothing with reflected boundaries.
//!
//! The kernel is truncated at `floor(4 σ + 0.5)` samples on each side and
//! normalized to unit mass. Samples beyond either end are mirrored about the
//! edge including the edge sample itself (`d c b a | a b c d | d c b a`), so
//! a constant series is left unchanged and no mass leaks at the borders.
use ndarray::{Array1, ArrayView1};

/// Kernel truncation in units of `sigma`.
pub const TRUNCATE: f64 = 4.0;

/// Smooth `input` with a normalized Gaussian kernel of standard deviation
/// `sigma` (in samples).
///
/// Returns an array of the same length. An empty input yields an empty
/// output; `sigma <= 0` (or non-finite) returns the input unchanged.
pub fn gaussian_filter1d(input: ArrayView1<'_, f64>, sigma: f64) -> Array1<f64> {
    let n = input.len();
    if n == 0 || !(sigma.is_finite() && sigma > 0.0) {
        return input.to_owned();
    }

    let weights = gaussian_weights(sigma);
    let radius = (weights.len() / 2) as isize;
    Array1::from_shape_fn(n, |i| {
        weights
            .iter()
            .enumerate()
            .map(|(k, w)| w * input[reflect(i as isize + k as isize - radius, n)])
            .sum()
    })
}

/// Normalized kernel of length `2 r + 1`.
fn gaussian_weights(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5).floor() as isize;
    let raw: Vec<f64> =
        (-radius..=radius).map(|x| (-0.5 * (x as f64 / sigma).powi(2)).exp()).collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / total).collect()
}

/// Map any integer position onto `0..n` with half-sample symmetric reflection.
fn reflect(position: isize, n: usize) -> usize {
    let period = 2 * n as isize;
    let folded = position.rem_euclid(period) as usize;
    if folded < n { folded } else { 2 * n - 1 - folded }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Kernel normalization and boundary reflection.
    // - Hand-computed outputs for an interior and an edge impulse.
    // -------------------------------------------------------------------------

    /// Σ exp(-x²/2) for x in -4..=4, the normalizer of the σ = 1 kernel.
    const UNIT_KERNEL_MASS: f64 = 2.506_620_8;

    #[test]
    fn reflect_mirrors_including_edge_sample() {
        let n = 4;

        let mapped: Vec<usize> = (-3..8).map(|m| reflect(m, n)).collect();

        assert_eq!(mapped, vec![2, 1, 0, 0, 1, 2, 3, 3, 2, 1, 0]);
    }

    #[test]
    fn weights_have_scipy_radius_and_unit_mass() {
        let weights = gaussian_weights(3.0);

        assert_eq!(weights.len(), 2 * 12 + 1);
        assert_abs_diff_eq!(weights.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Reflected boundaries must leave a constant series untouched, even when
    // the kernel is wider than the series.
    fn constant_series_is_preserved() {
        let input = Array1::from_elem(7, 4.5);

        let output = gaussian_filter1d(input.view(), 3.0);

        for value in output.iter() {
            assert_abs_diff_eq!(*value, 4.5, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Check two values computed by hand for σ = 1 (radius 4).
    //
    // Given
    // -----
    // - An interior impulse `[0, 0, 1, 0, 0]`: the centre receives w₀ only.
    // - An edge impulse `[1, 0, 0, 0, 0]`: position 0 receives w₀ + w₁
    //   because offset −1 reflects back onto index 0.
    fn impulse_responses_match_hand_computation() {
        let interior = gaussian_filter1d(array![0.0, 0.0, 1.0, 0.0, 0.0].view(), 1.0);
        let edge = gaussian_filter1d(array![1.0, 0.0, 0.0, 0.0, 0.0].view(), 1.0);

        assert_abs_diff_eq!(interior[2], 1.0 / UNIT_KERNEL_MASS, epsilon = 1e-6);
        assert_abs_diff_eq!(edge[0], (1.0 + (-0.5f64).exp()) / UNIT_KERNEL_MASS, epsilon = 1e-6);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let output = gaussian_filter1d(Array1::<f64>::zeros(0).view(), 3.0);

        assert!(output.is_empty());
    }
}
