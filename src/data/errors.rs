//! Errors for region data construction (length, uniqueness and value checks).
//!
//! [`DataError`] is raised by [`RegionData::new`](crate::data::RegionData::new)
//! before any cleaning is performed. It implements `Display`/`Error` and
//! converts to a Python `ValueError` when the `python-bindings` feature is
//! enabled.
//!
//! ## Conventions
//! - **Indices are 0-based** and refer to the raw, untrimmed input.
//! - Cumulative cases must be finite; negative increments are not rejected
//!   here because they are legitimate reporting corrections.
use chrono::NaiveDate;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type DataResult<T> = Result<T, DataError>;

/// Validation failures of a region series.
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    /// `dates` and `cases` differ in length.
    LengthMismatch { dates: usize, cases: usize },

    /// A date appears more than once.
    DuplicateDates { date: NaiveDate },

    /// No observations were supplied.
    EmptySeries,

    /// A cumulative case value is NaN/±inf.
    InvalidCases { index: usize, value: f64 },
}

impl std::error::Error for DataError {}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::LengthMismatch { dates, cases } => write!(
                f,
                "`dates` and `cases` must have the same length, got {dates} dates and {cases} cases."
            ),
            DataError::DuplicateDates { date } => {
                write!(f, "Values of `dates` are not unique: {date} appears more than once.")
            }
            DataError::EmptySeries => write!(f, "Region series must not be empty."),
            DataError::InvalidCases { index, value } => {
                write!(f, "Invalid cumulative cases {value} at index {index}: must be finite.")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<DataError> for PyErr {
    fn from(err: DataError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
