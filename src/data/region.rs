//! Region case series and the cleaning step that produces new cases.
//!
//! Purpose
//! -------
//! Hold one region's cumulative case counts with their reporting dates, and
//! derive the smoothed daily new-case series consumed by the Rt estimator.
//!
//! Key behaviors
//! -------------
//! - [`RegionData::new`] validates the raw series, trims the leading run of
//!   days on which the cumulative count did not change, and smooths the
//!   remaining daily increments.
//! - Trimming never discards more than `ceil(0.2 · n)` points so that a
//!   region with a long silent start still keeps most of its history.
//! - New cases are `gaussian_filter1d(diff(cases), 3)` with the first
//!   cumulative value prepended, so they align with `dates` one to one.
//!
//! Invariants & assumptions
//! ------------------------
//! - After construction `dates`, `cases` and `new_cases` share the same,
//!   non-zero length.
//! - Dates are unique but are not required to be sorted or contiguous; the
//!   series is taken in the order given.
//!
//! Testing notes
//! -------------
//! - Unit tests cover each validation error, the trimming rule and its cap,
//!   alignment of the derived series, and the `Display` summary.
use crate::{
    data::{
        errors::{DataError, DataResult},
        smoothing::gaussian_filter1d,
    },
    modelling::{HdiOptions, RtEstimate, RtResult, SystromOptions, compute_rt},
};
use chrono::NaiveDate;
use ndarray::{Array1, s};
use std::collections::HashSet;

/// Largest share of the series that may be discarded as a silent start.
pub const MAX_TRIM_FRACTION: f64 = 0.2;

/// Standard deviation, in days, of the smoothing kernel for new cases.
pub const SMOOTHING_SIGMA: f64 = 3.0;

/// `RegionData` — validated, trimmed case series of one region.
///
/// Fields
/// ------
/// - `name`, `code`: identification of the region.
/// - `dates`: reporting dates after trimming.
/// - `cases`: cumulative cases after trimming.
/// - `new_cases`: smoothed daily new cases aligned with `dates`.
/// - `trimmed`: number of leading points discarded by the cleaning step.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionData {
    name: String,
    code: String,
    dates: Vec<NaiveDate>,
    cases: Array1<f64>,
    new_cases: Array1<f64>,
    trimmed: usize,
}

impl RegionData {
    /// Build a region from raw cumulative counts.
    ///
    /// Errors
    /// ------
    /// - `DataError::LengthMismatch` if `dates.len() != cases.len()`.
    /// - `DataError::EmptySeries` if no observations are given.
    /// - `DataError::DuplicateDates` for the first repeated date.
    /// - `DataError::InvalidCases` for the first non-finite value.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// use chrono::NaiveDate;
    /// use opendemic::data::RegionData;
    ///
    /// let start = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
    /// let dates: Vec<_> = start.iter_days().take(4).collect();
    /// let region = RegionData::new("Lombardia", "03", dates, vec![0.0, 0.0, 5.0, 12.0])?;
    /// assert_eq!(region.npoints(), 3);
    /// assert_eq!(region.new_cases().len(), 3);
    /// # Ok::<(), opendemic::data::DataError>(())
    /// ```
    pub fn new(
        name: impl Into<String>, code: impl Into<String>, dates: Vec<NaiveDate>, cases: Vec<f64>,
    ) -> DataResult<Self> {
        if dates.len() != cases.len() {
            return Err(DataError::LengthMismatch { dates: dates.len(), cases: cases.len() });
        }
        if cases.is_empty() {
            return Err(DataError::EmptySeries);
        }
        let mut seen = HashSet::with_capacity(dates.len());
        if let Some(&date) = dates.iter().find(|date| !seen.insert(**date)) {
            return Err(DataError::DuplicateDates { date });
        }
        if let Some((index, &value)) = cases.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(DataError::InvalidCases { index, value });
        }

        let cases = Array1::from(cases);
        let trimmed = leading_silent_points(&cases);
        let cases = cases.slice(s![trimmed..]).to_owned();
        let dates = dates[trimmed..].to_vec();
        let new_cases = smoothed_new_cases(&cases);

        Ok(RegionData { name: name.into(), code: code.into(), dates, cases, new_cases, trimmed })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Cumulative cases after trimming.
    pub fn cases(&self) -> &Array1<f64> {
        &self.cases
    }

    /// Smoothed daily new cases; the raw increments are `diff(cases)`.
    pub fn new_cases(&self) -> &Array1<f64> {
        &self.new_cases
    }

    pub fn npoints(&self) -> usize {
        self.cases.len()
    }

    /// Number of leading observations dropped during cleaning.
    pub fn trimmed(&self) -> usize {
        self.trimmed
    }

    /// Rt trajectory of this region, aligned with [`RegionData::dates`].
    pub fn compute_rt(&self, model: &SystromOptions, hdi: &HdiOptions) -> RtResult<RtEstimate> {
        compute_rt(&self.new_cases, model, hdi)
    }
}

impl std::fmt::Display for RegionData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Region: {}, {}.", self.name, self.code)?;
        writeln!(f, "N. data points: {}.", self.dates.len())?;
        match (self.dates.first(), self.dates.last(), self.cases.iter().next_back()) {
            (Some(first), Some(last), Some(cases)) => {
                writeln!(f, "Dates from {first} to {last}.")?;
                write!(f, "Cases at {last}: {cases}.")
            }
            _ => Ok(()),
        }
    }
}

/// Index of the first point after the leading run of zero increments,
/// capped at `ceil(MAX_TRIM_FRACTION · n)`.
fn leading_silent_points(cases: &Array1<f64>) -> usize {
    let silent = cases.windows(2).into_iter().take_while(|pair| pair[1] - pair[0] == 0.0).count();
    let cap = (MAX_TRIM_FRACTION * cases.len() as f64).ceil() as usize;
    silent.min(cap)
}

fn smoothed_new_cases(cases: &Array1<f64>) -> Array1<f64> {
    let increments = &cases.slice(s![1..]) - &cases.slice(s![..-1]);
    let smoothed = gaussian_filter1d(increments.view(), SMOOTHING_SIGMA);

    let mut new_cases = Array1::zeros(cases.len());
    new_cases[0] = cases[0];
    new_cases.slice_mut(s![1..]).assign(&smoothed);
    new_cases
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Validation errors of `RegionData::new`.
    // - Trimming of the silent start and the 20% cap.
    // - Alignment of dates, cumulative and new cases.
    //
    // They intentionally DO NOT cover:
    // - Numerical properties of the smoother (see `smoothing`).
    // -------------------------------------------------------------------------

    fn days(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2020, 2, 24).unwrap();
        start.iter_days().take(n).collect()
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let result = RegionData::new("A", "1", days(3), vec![1.0, 2.0]);

        assert_eq!(result.unwrap_err(), DataError::LengthMismatch { dates: 3, cases: 2 });
    }

    #[test]
    fn empty_series_is_rejected() {
        let result = RegionData::new("A", "1", Vec::new(), Vec::new());

        assert_eq!(result.unwrap_err(), DataError::EmptySeries);
    }

    #[test]
    fn duplicate_dates_are_rejected() {
        let mut dates = days(3);
        dates[2] = dates[0];

        let result = RegionData::new("A", "1", dates.clone(), vec![1.0, 2.0, 3.0]);

        assert_eq!(result.unwrap_err(), DataError::DuplicateDates { date: dates[0] });
    }

    #[test]
    fn non_finite_cases_are_rejected() {
        let result = RegionData::new("A", "1", days(3), vec![1.0, f64::NAN, 3.0]);

        match result {
            Err(DataError::InvalidCases { index: 1, value }) => assert!(value.is_nan()),
            other => panic!("expected InvalidCases at index 1, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Leading days without new reports are dropped together with their dates.
    //
    // Given
    // -----
    // - Ten points whose cumulative count stays at 0 for the first two days.
    //
    // Expect
    // ------
    // - Two points trimmed (cap is ceil(0.2 · 10) = 2).
    // - The series starts at the third date.
    fn silent_start_is_trimmed() {
        // Arrange
        let dates = days(10);
        let cases = vec![0.0, 0.0, 0.0, 3.0, 7.0, 12.0, 20.0, 31.0, 45.0, 60.0];

        // Act
        let region = RegionData::new("A", "1", dates.clone(), cases).unwrap();

        // Assert
        assert_eq!(region.trimmed(), 2);
        assert_eq!(region.npoints(), 8);
        assert_eq!(region.dates()[0], dates[2]);
        assert_eq!(region.cases()[0], 0.0);
    }

    #[test]
    fn trimming_is_capped_at_twenty_percent() {
        let mut cases = vec![5.0; 6];
        cases.extend([8.0, 12.0, 20.0, 25.0]);

        let region = RegionData::new("A", "1", days(10), cases).unwrap();

        assert_eq!(region.trimmed(), 2);
        assert_eq!(region.npoints(), 8);
    }

    #[test]
    fn new_cases_align_with_dates_and_start_with_first_cumulative_value() {
        let cases = vec![10.0, 14.0, 20.0, 27.0, 35.0, 44.0];

        let region = RegionData::new("A", "1", days(6), cases).unwrap();

        assert_eq!(region.new_cases().len(), region.dates().len());
        assert_eq!(region.new_cases()[0], 10.0);
        let raw_total = 44.0 - 10.0;
        let smoothed_total: f64 = region.new_cases().slice(s![1..]).sum();
        assert_abs_diff_eq!(smoothed_total, raw_total, epsilon = 1e-9);
    }

    #[test]
    fn single_point_region_is_kept() {
        let region = RegionData::new("A", "1", days(1), vec![3.0]).unwrap();

        assert_eq!(region.npoints(), 1);
        assert_eq!(region.new_cases().to_vec(), vec![3.0]);
    }

    #[test]
    fn display_summarizes_region() {
        let region = RegionData::new("Veneto", "05", days(3), vec![1.0, 2.0, 4.0]).unwrap();

        let summary = region.to_string();

        assert!(summary.starts_with("Region: Veneto, 05."));
        assert!(summary.contains("N. data points: 3."));
        assert!(summary.contains("Cases at 2020-02-26: 4."));
    }
}
