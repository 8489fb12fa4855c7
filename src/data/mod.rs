//! data — region case series and their cleaning pipeline.
//!
//! Purpose
//! -------
//! Turn raw cumulative case reports of a region into the smoothed daily
//! new-case series the Rt estimator consumes, keeping dates aligned.
//!
//! Key behaviors
//! -------------
//! - [`RegionData`] validates the raw series, drops a silent start of at most
//!   20% of the points and derives smoothed new cases.
//! - [`gaussian_filter1d`] provides the reflected-boundary Gaussian smoother
//!   used for the new cases.
//! - Failures are reported as [`DataError`] via [`DataResult`].
//!
//! Downstream usage
//! ----------------
//! - Build one [`RegionData`] per region, then call
//!   [`RegionData::compute_rt`] or collect the `new_cases` of several regions
//!   for [`sigma_update`](crate::modelling::sigma_update).

pub mod errors;
pub mod region;
pub mod smoothing;

pub use self::errors::{DataError, DataResult};
pub use self::region::RegionData;
pub use self::smoothing::gaussian_filter1d;
