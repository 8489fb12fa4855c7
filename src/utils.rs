//! Conversion helpers shared by the PyO3 bindings.
//!
//! Python callers pass numpy arrays, pandas objects or nested sequences. They
//! are normalized into read-only `float64` numpy arrays of any dimension; the
//! Rust entry points then apply their own squeeze and shape checks, so a
//! column vector from numpy behaves like a flat series.
#[cfg(feature = "python-bindings")]
use ndarray::ArrayD;

#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArrayDyn;

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::PyTypeError,
    prelude::*,
    types::{PyAny, PyDict},
};

#[cfg(feature = "python-bindings")]
use crate::modelling::{RtResult, SigmaGrid};

/// Borrow or convert a Python object into a read-only `float64` array.
///
/// Order of attempts: an existing `float64` ndarray (no copy), the result of
/// `obj.to_numpy(False)` for pandas objects, then `numpy.asarray(obj,
/// dtype="float64")`, which keeps the shape of nested lists.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArrayDyn<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArrayDyn<f64>>() {
        return Ok(arr_ro);
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArrayDyn<f64>>() {
            return Ok(series_ro);
        }
    }

    let kwargs = PyDict::new(py);
    kwargs.set_item("dtype", "float64")?;
    let converted =
        py.import("numpy")?.call_method("asarray", (raw_data,), Some(&kwargs)).map_err(|_| {
            PyTypeError::new_err(
                "expected a numpy.ndarray, pandas.Series, or (nested) sequence of float64",
            )
        })?;
    converted.extract::<PyReadonlyArrayDyn<f64>>()
}

/// Convert an iterable of case series into owned arrays for the sigma search.
#[cfg(feature = "python-bindings")]
pub fn extract_regions<'py>(
    py: Python<'py>, raw_regions: &Bound<'py, PyAny>,
) -> PyResult<Vec<ArrayD<f64>>> {
    raw_regions
        .try_iter()?
        .map(|item| -> PyResult<ArrayD<f64>> {
            Ok(extract_f64_array(py, &item?)?.as_array().to_owned())
        })
        .collect()
}

/// Build a [`SigmaGrid`] from an optional Python sequence of candidates.
#[cfg(feature = "python-bindings")]
pub fn extract_sigma_grid(sigma_grid: Option<Vec<f64>>) -> RtResult<SigmaGrid> {
    match sigma_grid {
        Some(values) => SigmaGrid::new(values),
        None => Ok(SigmaGrid::default()),
    }
}
