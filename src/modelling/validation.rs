//! modelling::validation — shared input guards for Rt estimation.
//!
//! Purpose
//! -------
//! Centralize the shape and parameter checks performed by the filter, the
//! credible-interval routine and the sigma search so that every public entry
//! point fails fast, before any numeric work, with the same error semantics.
//!
//! Key behaviors
//! -------------
//! - [`squeeze_to_1d`] removes every axis of length 1 and requires exactly
//!   one dimension to remain, mirroring numpy's `squeeze` + `ndim` check.
//! - [`validate_counts`] enforces length ≥ 2 and finite, non-negative counts.
//! - [`validate_sigma`] and [`validate_confidence`] guard scalar parameters.
//!
//! Conventions
//! -----------
//! - Guards only inspect data; they never copy or rescale it.
//! - Zero counts are accepted: they are a data anomaly the filter reports
//!   through NaN propagation, not a contract violation.

use crate::modelling::errors::{RtError, RtResult};
use ndarray::{ArrayBase, ArrayView1, Axis, Data, Dimension, Ix1};

/// Squeeze an array of any dimensionality into a 1-D view.
///
/// Parameters
/// ----------
/// - `input`: `&ArrayBase<S, D>`
///   Array of `f64` values with any storage and dimensionality.
///
/// Returns
/// -------
/// `RtResult<ArrayView1<f64>>`
///   A view over the same data once all length-1 axes are removed.
///
/// Errors
/// ------
/// - `RtError::InvalidShape { ndim }`
///   When the squeezed array is not one-dimensional. A single-element input
///   squeezes to zero dimensions and is rejected as well.
pub fn squeeze_to_1d<S, D>(input: &ArrayBase<S, D>) -> RtResult<ArrayView1<'_, f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let mut view = input.view().into_dyn();
    for axis in (0..view.ndim()).rev() {
        if view.len_of(Axis(axis)) == 1 {
            view = view.index_axis_move(Axis(axis), 0);
        }
    }
    let ndim = view.ndim();
    view.into_dimensionality::<Ix1>().map_err(|_| RtError::InvalidShape { ndim })
}

/// Check that a case series can drive at least one filter step.
///
/// Errors
/// ------
/// - `RtError::InsufficientData` when `counts.len() < 2`.
/// - `RtError::InvalidCount` for the first negative or non-finite count.
pub fn validate_counts(counts: &ArrayView1<'_, f64>) -> RtResult<()> {
    if counts.len() < 2 {
        return Err(RtError::InsufficientData { len: counts.len() });
    }
    for (index, &value) in counts.iter().enumerate() {
        if !value.is_finite() || value < 0.0 {
            return Err(RtError::InvalidCount { index, value });
        }
    }
    Ok(())
}

/// Squeeze a case series to 1-D and validate it in one step.
pub fn squeeze_counts<S, D>(series: &ArrayBase<S, D>) -> RtResult<ArrayView1<'_, f64>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let counts = squeeze_to_1d(series)?;
    validate_counts(&counts)?;
    Ok(counts)
}

/// Require a finite, strictly positive transition scale.
pub fn validate_sigma(sigma: f64) -> RtResult<()> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(RtError::InvalidSigma { value: sigma });
    }
    Ok(())
}

/// Require a credible level in the open interval (0, 1).
pub fn validate_confidence(p: f64) -> RtResult<()> {
    if !(p > 0.0 && p < 1.0) {
        return Err(RtError::InvalidConfidence { value: p });
    }
    Ok(())
}
