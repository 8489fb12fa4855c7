//! modelling — Bayesian real-time estimation of the reproduction number.
//!
//! Purpose
//! -------
//! Collect the estimation pipeline for the effective reproduction number Rt:
//! a sequential Bayesian filter over a fixed Rt grid, highest-density
//! credible intervals, per-step point estimates, and a grid search for the
//! random-walk scale of the filter.
//!
//! Key behaviors
//! -------------
//! - [`get_posteriors`] runs the filter and returns one posterior pmf per time
//!   step together with the total log-likelihood ([`Posteriors`]).
//! - [`high_density_interval`] extracts the narrowest grid range holding more
//!   than `p` of a posterior's mass.
//! - [`compute_rt`] combines both into an Rt trajectory with credible bounds
//!   ([`RtEstimate`]).
//! - [`sigma_update`] / [`search_sigma`] select the transition scale that
//!   maximizes the log-likelihood summed over several regions.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every posterior is aligned with [`grid::RT_RANGE`] (0 to 12 in steps of
//!   0.01). The grid is built once and shared read-only.
//! - All entry points validate their inputs through [`validation`] before any
//!   numeric work and report failures as [`RtError`] via [`RtResult`].
//! - Numeric degeneracy (a zero case count followed by a positive one) is not
//!   an error: NaN values propagate through posteriors, log-likelihoods and
//!   Rt estimates so the anomaly stays visible.
//!
//! Conventions
//! -----------
//! - Case series are accepted as any `ndarray` that squeezes to one
//!   dimension, mirroring how column vectors arrive from numpy.
//! - Tuning parameters live in the validated option structs of [`options`].
//!
//! Downstream usage
//! ----------------
//! - Typical Rust code imports the main surface as:
//!
//!   ```rust
//!   use ndarray::array;
//!   use opendemic::modelling::prelude::*;
//!
//!   let estimate = compute_rt(
//!       &array![100.0, 120.0, 150.0, 180.0],
//!       &SystromOptions::default(),
//!       &HdiOptions::default(),
//!   )?;
//!   assert_eq!(estimate.len(), 4);
//!   # Ok::<(), RtError>(())
//!   ```
//!
//! Testing notes
//! -------------
//! - Each submodule carries its own unit tests; the end-to-end pipeline
//!   (region data → Rt, sigma selection across regions) is covered by the
//!   integration tests under `tests/`.

pub mod errors;
pub mod grid;
pub mod hdi;
pub mod options;
pub mod rt;
pub mod sigma_search;
pub mod systrom;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{RtError, RtResult};
pub use self::grid::{GAMMA, RT_RANGE};
pub use self::hdi::high_density_interval;
pub use self::options::{HdiOptions, SigmaGrid, SigmaSearchOptions, SystromOptions};
pub use self::rt::{RtEstimate, compute_rt};
pub use self::sigma_search::{GridSearch, SigmaSearchOutcome, search_sigma, sigma_update};
pub use self::systrom::{Posteriors, get_posteriors};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::errors::{RtError, RtResult};
    pub use super::hdi::high_density_interval;
    pub use super::options::{HdiOptions, SigmaGrid, SigmaSearchOptions, SystromOptions};
    pub use super::rt::{RtEstimate, compute_rt};
    pub use super::sigma_search::{search_sigma, sigma_update};
    pub use super::systrom::{Posteriors, get_posteriors};
}
