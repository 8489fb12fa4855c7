//! modelling::rt — point estimates and credible bands for a full series.
//!
//! One filter run, then for every posterior row the most probable grid value
//! (first maximum on ties) and the highest-density interval. Outputs are
//! positionally aligned with the input; pairing them with dates is left to
//! the caller.
use crate::modelling::{
    errors::RtResult,
    grid::rt_range,
    hdi::high_density_interval,
    options::{HdiOptions, SystromOptions},
    systrom::get_posteriors,
};
use ndarray::{Array1, ArrayBase, ArrayView1, Data, Dimension};

/// Rt trajectory with its lower and upper credible bounds.
///
/// All three arrays have the same length as the input series. Steps whose
/// posterior is non-finite (a degenerate filter step) are NaN in all three.
#[derive(Debug, Clone, PartialEq)]
pub struct RtEstimate {
    pub rt: Array1<f64>,
    pub low: Array1<f64>,
    pub high: Array1<f64>,
}

impl RtEstimate {
    pub fn len(&self) -> usize {
        self.rt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rt.is_empty()
    }
}

/// Compute the Rt time series with its credible interval.
///
/// Errors are those of [`get_posteriors`] and [`high_density_interval`];
/// the latter cannot fail on a finite, normalized posterior row.
pub fn compute_rt<S, D>(
    new_cases: &ArrayBase<S, D>, model: &SystromOptions, hdi: &HdiOptions,
) -> RtResult<RtEstimate>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let posteriors = get_posteriors(new_cases, model.sigma)?;
    let grid = rt_range();
    let n = posteriors.len();

    let mut rt = Array1::from_elem(n, f64::NAN);
    let mut low = Array1::from_elem(n, f64::NAN);
    let mut high = Array1::from_elem(n, f64::NAN);
    for (t, row) in posteriors.probabilities.rows().into_iter().enumerate() {
        if row.iter().any(|v| !v.is_finite()) {
            continue;
        }
        rt[t] = grid[argmax(&row)];
        (low[t], high[t]) = high_density_interval(&row, hdi.p)?;
    }

    Ok(RtEstimate { rt, low, high })
}

/// Index of the first maximum.
fn argmax(row: &ArrayView1<'_, f64>) -> usize {
    let mut best = 0;
    for (i, &value) in row.iter().enumerate() {
        if value > row[best] {
            best = i;
        }
    }
    best
}
