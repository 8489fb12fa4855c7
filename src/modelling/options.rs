//! Configuration for the systrom model, credible intervals and sigma search.
//!
//! - [`SystromOptions`]: transition scale `sigma` of the Gaussian random walk.
//! - [`HdiOptions`]: credible level `p` of the highest-density interval.
//! - [`SigmaGrid`]: ordered candidate scales evaluated by the sigma search.
//! - [`SigmaSearchOptions`]: grid plus verbosity of the search.
//!
//! Every constructor validates its inputs and returns [`RtResult`]; the
//! `Default` impls reproduce the package defaults (`sigma = 0.25`,
//! `p = 0.9`, 20 sigmas evenly spaced over `[0.05, 1.0]`).
use crate::modelling::{
    errors::{RtError, RtResult},
    validation::{validate_confidence, validate_sigma},
};
use ndarray::Array1;

/// Default transition scale.
pub const DEFAULT_SIGMA: f64 = 0.25;

/// Default credible level.
pub const DEFAULT_CONFIDENCE: f64 = 0.9;

/// Bounds and size of the default sigma grid.
pub const DEFAULT_SIGMA_GRID: (f64, f64, usize) = (0.05, 1.0, 20);

/// Model-level configuration of the sequential filter.
///
/// Fields:
/// - `sigma: f64`: standard deviation of the day-to-day Rt random walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystromOptions {
    pub sigma: f64,
}

impl SystromOptions {
    /// Build options for a given transition scale; `sigma` must be finite
    /// and strictly positive.
    pub fn new(sigma: f64) -> RtResult<Self> {
        validate_sigma(sigma)?;
        Ok(Self { sigma })
    }
}

impl Default for SystromOptions {
    fn default() -> Self {
        Self { sigma: DEFAULT_SIGMA }
    }
}

/// Credible-interval configuration.
///
/// Fields:
/// - `p: f64`: target probability mass, strictly between 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HdiOptions {
    pub p: f64,
}

impl HdiOptions {
    pub fn new(p: f64) -> RtResult<Self> {
        validate_confidence(p)?;
        Ok(Self { p })
    }
}

impl Default for HdiOptions {
    fn default() -> Self {
        Self { p: DEFAULT_CONFIDENCE }
    }
}

/// Ordered, non-empty set of candidate transition scales.
///
/// Order matters: the search keeps the first candidate among equally likely
/// ones.
#[derive(Debug, Clone, PartialEq)]
pub struct SigmaGrid {
    values: Vec<f64>,
}

impl SigmaGrid {
    /// Build a grid from explicit candidates.
    ///
    /// Errors:
    /// - `RtError::EmptySigmaGrid` when `values` is empty.
    /// - `RtError::InvalidSigma` for the first non-positive or non-finite value.
    pub fn new(values: Vec<f64>) -> RtResult<Self> {
        if values.is_empty() {
            return Err(RtError::EmptySigmaGrid);
        }
        for &sigma in &values {
            validate_sigma(sigma)?;
        }
        Ok(Self { values })
    }

    /// `len` evenly spaced candidates over `[start, end]`.
    pub fn linspace(start: f64, end: f64, len: usize) -> RtResult<Self> {
        Self::new(Array1::linspace(start, end, len).to_vec())
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for SigmaGrid {
    fn default() -> Self {
        let (start, end, len) = DEFAULT_SIGMA_GRID;
        Self { values: Array1::linspace(start, end, len).to_vec() }
    }
}

/// Sigma-search configuration.
///
/// Fields:
/// - `grid: SigmaGrid`: candidates, evaluated in order.
/// - `verbose: bool`: if `true`, attaches a slog observer (behind the
///   `obs_slog` feature) and prints a one-line summary before the search.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SigmaSearchOptions {
    pub grid: SigmaGrid,
    pub verbose: bool,
}

impl SigmaSearchOptions {
    pub fn new(grid: SigmaGrid, verbose: bool) -> Self {
        Self { grid, verbose }
    }
}
