//! modelling::errors — error type and Python bridge for Rt estimation.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by the sequential filter,
//! the credible-interval extraction, the full-series Rt computation and the
//! sigma grid search.
//!
//! Key behaviors
//! -------------
//! - Define [`RtResult`] and [`RtError`] as the canonical result and error
//!   types of the `modelling` subtree.
//! - Attach `Display` messages that embed the offending value so logs are
//!   meaningful without additional context.
//! - Map `argmin` runtime errors back into [`RtError`], recovering the
//!   original variant when a cost evaluation failed with one.
//! - Implement `From<RtError> for PyErr` when the `python-bindings` feature
//!   is enabled.
//!
//! Invariants & assumptions
//! ------------------------
//! - Numeric degeneracy (a zero normalization constant in the filter) is NOT
//!   an error: it surfaces as NaN/Inf in the returned arrays. Only contract
//!   violations detected before numeric work are reported here, plus
//!   [`RtError::IntervalNotFound`] for pmfs that cannot reach the target mass.
//!
//! Testing notes
//! -------------
//! - Unit tests verify payload embedding in `Display` and the round trip
//!   through `argmin::core::Error`.

use argmin::core::{ArgminError, Error};

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type RtResult<T> = Result<T, RtError>;

/// RtError — failures of the Rt estimation routines.
///
/// Variants
/// --------
/// - `InvalidShape { ndim }`
///   Input did not squeeze to a one-dimensional array; `ndim` is the number
///   of dimensions left after removing axes of length 1.
/// - `InsufficientData { len }`
///   The case series has fewer than two points, so no transition exists.
/// - `InvalidCount { index, value }`
///   A case count is negative or non-finite.
/// - `InvalidSigma { value }`
///   The transition scale is non-positive or non-finite.
/// - `InvalidConfidence { value }`
///   The credible level lies outside the open interval (0, 1).
/// - `GridLengthMismatch { expected, found }`
///   A probability vector is not aligned with the Rt grid.
/// - `IntervalNotFound { p }`
///   No contiguous range of the pmf carries more than `p` of the mass.
/// - `EmptySigmaGrid`, `NoRegions`
///   The sigma search has nothing to evaluate.
/// - `Backend { text }`
///   Any other error raised by the `argmin` executor.
#[derive(Debug, Clone, PartialEq)]
pub enum RtError {
    // ---- Input validation ----
    InvalidShape { ndim: usize },
    InsufficientData { len: usize },
    InvalidCount { index: usize, value: f64 },
    InvalidSigma { value: f64 },
    InvalidConfidence { value: f64 },
    GridLengthMismatch { expected: usize, found: usize },

    // ---- Credible interval ----
    IntervalNotFound { p: f64 },

    // ---- Sigma search ----
    EmptySigmaGrid,
    NoRegions,
    Backend { text: String },
}

impl std::error::Error for RtError {}

impl std::fmt::Display for RtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RtError::InvalidShape { ndim } => {
                write!(f, "Input must be a 1d array, got {ndim} dimensions after squeezing.")
            }
            RtError::InsufficientData { len } => {
                write!(f, "Need at least 2 observations to compute a transition, got {len}.")
            }
            RtError::InvalidCount { index, value } => {
                write!(f, "Invalid case count {value} at index {index}: must be finite and >= 0.")
            }
            RtError::InvalidSigma { value } => {
                write!(f, "Invalid sigma {value}: must be finite and > 0.")
            }
            RtError::InvalidConfidence { value } => {
                write!(f, "Invalid credible level {value}: must lie in (0, 1).")
            }
            RtError::GridLengthMismatch { expected, found } => {
                write!(f, "Probability vector length mismatch: expected {expected}, found {found}.")
            }
            RtError::IntervalNotFound { p } => {
                write!(f, "No contiguous range of the pmf holds more than {p} of the mass.")
            }
            RtError::EmptySigmaGrid => write!(f, "Sigma grid must contain at least one value."),
            RtError::NoRegions => write!(f, "At least one region series is required."),
            RtError::Backend { text } => write!(f, "Backend error: {text}"),
        }
    }
}

impl From<Error> for RtError {
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<RtError>() {
            Ok(rt_err) => return rt_err,
            Err(err) => err,
        };
        match original_err.downcast::<ArgminError>() {
            Ok(argmin_err) => RtError::Backend { text: argmin_err.to_string() },
            Err(err) => RtError::Backend { text: err.to_string() },
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<RtError> for PyErr {
    fn from(err: RtError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
