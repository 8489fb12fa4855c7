//! opendemic — real-time Bayesian estimation of the reproduction number Rt.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the Rt estimation routines to Python via the `_opendemic` extension module.
//! When the `python-bindings` feature is enabled, this module defines the
//! Python-facing functions and the `modelling` submodule used by the
//! `opendemic` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`modelling` and `data`) as the public
//!   crate surface.
//! - Define `#[pyfunction]` wrappers and the `#[pymodule]` initializer for the
//!   `_opendemic` Python extension.
//! - Create and register the `modelling` Python submodule under `opendemic`
//!   so that dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this file
//!   performs only FFI glue, input conversion, and error mapping.
//! - Python inputs are converted with `numpy.asarray(..., dtype="float64")`
//!   semantics, keeping their shape; squeezing and validation happen in the
//!   Rust entry points exactly as for native callers.
//!
//! Conventions
//! -----------
//! - Every crate error ([`modelling::RtError`], [`data::DataError`]) is raised
//!   in Python as `ValueError` with the Rust `Display` message.
//! - Arrays returned to Python are freshly allocated numpy arrays owned by the
//!   interpreter.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on [`modelling`] and [`data`] and
//!   can ignore the PyO3 items guarded by the `python-bindings` feature.
//! - The Python packaging layer imports `_opendemic.modelling` and re-exports
//!   its functions from `opendemic.modelling`.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules and
//!   by the integration tests under `tests/`.

pub mod data;
pub mod modelling;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    modelling::{
        HdiOptions, RT_RANGE, SystromOptions, compute_rt, get_posteriors, high_density_interval,
        sigma_update,
    },
    utils::{extract_f64_array, extract_regions, extract_sigma_grid},
};

/// get_posteriors — run the sequential Bayesian filter from Python.
///
/// Parameters
/// ----------
/// - `ts`: array-like of new cases; anything that squeezes to 1-D.
/// - `sigma`: `float`, standard deviation of the Rt random walk.
///
/// Returns
/// -------
/// `(posteriors, log_likelihood)`
///   An `(n, len(RT_RANGE))` float64 array and the total log-likelihood.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "get_posteriors", signature = (ts, sigma = 0.25), text_signature = "(ts, /, sigma=0.25)")]
pub fn py_get_posteriors<'py>(
    py: Python<'py>, ts: &Bound<'py, PyAny>, sigma: f64,
) -> PyResult<(Bound<'py, PyArray2<f64>>, f64)> {
    let series = extract_f64_array(py, ts)?;
    let posteriors = get_posteriors(&series.as_array(), sigma)?;
    Ok((posteriors.probabilities.into_pyarray(py), posteriors.log_likelihood))
}

/// high_density_interval — narrowest Rt range holding more than `p` of `pmf`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "high_density_interval", signature = (pmf, p = 0.9), text_signature = "(pmf, /, p=0.9)")]
pub fn py_high_density_interval<'py>(
    py: Python<'py>, pmf: &Bound<'py, PyAny>, p: f64,
) -> PyResult<(f64, f64)> {
    let pmf = extract_f64_array(py, pmf)?;
    Ok(high_density_interval(&pmf.as_array(), p)?)
}

/// compute_rt — Rt trajectory with its credible bounds.
///
/// Returns
/// -------
/// `(rt, low, high)`
///   Three float64 arrays aligned with `new_cases`; degenerate steps are NaN.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "compute_rt",
    signature = (new_cases, sigma = 0.25, p = 0.9),
    text_signature = "(new_cases, /, sigma=0.25, p=0.9)"
)]
pub fn py_compute_rt<'py>(
    py: Python<'py>, new_cases: &Bound<'py, PyAny>, sigma: f64, p: f64,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>)> {
    let series = extract_f64_array(py, new_cases)?;
    let model = SystromOptions::new(sigma)?;
    let hdi = HdiOptions::new(p)?;
    let estimate = compute_rt(&series.as_array(), &model, &hdi)?;
    Ok((estimate.rt.into_pyarray(py), estimate.low.into_pyarray(py), estimate.high.into_pyarray(py)))
}

/// sigma_update — pick the random-walk scale that best explains all regions.
///
/// `regions` is an iterable of new-case series; `sigma_grid` defaults to 20
/// equally spaced values in [0.05, 1.0].
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "sigma_update",
    signature = (regions, sigma_grid = None),
    text_signature = "(regions, /, sigma_grid=None)"
)]
pub fn py_sigma_update<'py>(
    py: Python<'py>, regions: &Bound<'py, PyAny>, sigma_grid: Option<Vec<f64>>,
) -> PyResult<f64> {
    let regions = extract_regions(py, regions)?;
    let grid = extract_sigma_grid(sigma_grid)?;
    Ok(sigma_update(&regions, &grid)?)
}

/// _opendemic — PyO3 module initializer for the Python extension.
///
/// Key behaviors
/// -------------
/// - Create the `modelling` submodule, populate it with the estimation
///   functions and the `RT_RANGE` grid, and attach it to `_opendemic`.
/// - Register the submodule in `sys.modules` so it is importable via a
///   dotted path from Python.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating the submodule or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _opendemic<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let modelling_mod = PyModule::new(_py, "modelling")?;
    modelling(_py, m, &modelling_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("opendemic.modelling", modelling_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn modelling<'py>(
    _py: Python<'py>, opendemic: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_get_posteriors, m)?)?;
    m.add_function(wrap_pyfunction!(py_high_density_interval, m)?)?;
    m.add_function(wrap_pyfunction!(py_compute_rt, m)?)?;
    m.add_function(wrap_pyfunction!(py_sigma_update, m)?)?;
    m.add("RT_RANGE", RT_RANGE.clone().into_pyarray(_py))?;
    opendemic.add_submodule(m)?;
    Ok(())
}
