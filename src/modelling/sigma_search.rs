//! Grid search for the random-walk scale `sigma`, run on an `argmin`
//! executor.
//!
//! Each candidate of a [`SigmaGrid`] is scored by the total log-likelihood of
//! the filter summed over every supplied region; the best candidate wins and
//! ties go to the first one in grid order. The search is a custom
//! [`Solver`] that evaluates one candidate per iteration, so the usual
//! `argmin` machinery (iteration counting, observers) applies unchanged.
//!
//! Convention: as in any `argmin` problem we *minimize* a cost, here
//! `c(σ) = −ℓ(σ)`. NaN totals are ranked as `+∞` so they never beat a
//! well-defined candidate; if every candidate is degenerate the first one is
//! returned.
use crate::modelling::{
    errors::{RtError, RtResult},
    options::{SigmaGrid, SigmaSearchOptions},
    systrom::{run_filter, transition_matrix},
    validation::squeeze_counts,
};
use argmin::{
    core::{
        CostFunction, Error, Executor, IterState, KV, Problem, Solver, State, TerminationReason,
        TerminationStatus,
    },
    kv,
};
use ndarray::{ArrayBase, ArrayView1, Data, Dimension};

/// Optimizer state used by the grid search: scalar parameter and cost.
type SigmaState = IterState<f64, (), (), (), (), f64>;

/// Result of a sigma search.
///
/// Fields:
/// - `sigma`: selected transition scale.
/// - `log_likelihood`: total log-likelihood of all regions at `sigma`.
/// - `evaluations`: number of candidates scored.
/// - `status`: executor termination status, for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct SigmaSearchOutcome {
    pub sigma: f64,
    pub log_likelihood: f64,
    pub evaluations: u64,
    pub status: String,
}

/// Select the sigma that maximizes the total log-likelihood of `regions`.
///
/// Returns only the winning candidate; see [`search_sigma`] for the full
/// outcome and for verbose runs.
///
/// # Errors
/// - `RtError::NoRegions` if `regions` is empty.
/// - Any validation error of the filter for an individual region
///   (`InvalidShape`, `InsufficientData`, `InvalidCount`).
pub fn sigma_update<S, D>(regions: &[ArrayBase<S, D>], grid: &SigmaGrid) -> RtResult<f64>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let opts = SigmaSearchOptions::new(grid.clone(), false);
    Ok(search_sigma(regions, &opts)?.sigma)
}

/// Run the sigma grid search and return the full outcome.
///
/// All regions are validated before the first candidate is scored. The
/// transition matrix of each candidate is built once and shared by every
/// region.
///
/// # Feature flags
/// If the `obs_slog` feature is enabled and `opts.verbose == true`, a
/// terminal slog observer is attached with `ObserverMode::Always` and a
/// one-line summary of the search is printed before the first candidate.
pub fn search_sigma<S, D>(
    regions: &[ArrayBase<S, D>], opts: &SigmaSearchOptions,
) -> RtResult<SigmaSearchOutcome>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    if regions.is_empty() {
        return Err(RtError::NoRegions);
    }
    let views = regions.iter().map(|region| squeeze_counts(region)).collect::<RtResult<Vec<_>>>()?;
    let candidates = opts.grid.values().to_vec();
    let first = candidates[0];

    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        eprintln!(
            "sigma search: {} candidates in [{:.4}, {:.4}], {} region(s)",
            candidates.len(),
            candidates.iter().cloned().fold(f64::INFINITY, f64::min),
            candidates.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            views.len()
        );
    }

    let problem = RegionsLikelihood { regions: views };
    let executor = Executor::new(problem, GridSearch::new(candidates))
        .configure(|state| state.param(first));
    #[cfg(feature = "obs_slog")]
    let executor = if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        executor.add_observer(observer, argmin::core::observers::ObserverMode::Always)
    } else {
        executor
    };

    let result = executor.run()?;
    let state = result.state();
    let sigma = state.get_param().copied().unwrap_or(first);
    Ok(SigmaSearchOutcome {
        sigma,
        log_likelihood: -state.get_cost(),
        evaluations: state.get_iter(),
        status: format!("{:?}", state.get_termination_status()),
    })
}

/// Total log-likelihood of several validated series as a function of sigma.
struct RegionsLikelihood<'a> {
    regions: Vec<ArrayView1<'a, f64>>,
}

impl RegionsLikelihood<'_> {
    fn total_log_likelihood(&self, sigma: f64) -> RtResult<f64> {
        let transition = transition_matrix(sigma)?;
        Ok(self
            .regions
            .iter()
            .map(|counts| run_filter(counts, &transition).log_likelihood)
            .sum())
    }
}

impl CostFunction for RegionsLikelihood<'_> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, sigma: &f64) -> Result<f64, Error> {
        Ok(-self.total_log_likelihood(*sigma)?)
    }
}

/// Exhaustive search over an ordered list of scalar candidates.
///
/// One candidate is evaluated per iteration. The state always carries the
/// best candidate seen so far, compared with a strict `<` so that earlier
/// candidates win ties.
#[derive(Debug, Clone)]
pub struct GridSearch {
    candidates: Vec<f64>,
    cursor: usize,
    best: Option<(f64, f64)>,
}

impl GridSearch {
    pub fn new(candidates: Vec<f64>) -> Self {
        Self { candidates, cursor: 0, best: None }
    }
}

impl<O> Solver<O, SigmaState> for GridSearch
where
    O: CostFunction<Param = f64, Output = f64>,
{
    const NAME: &'static str = "Grid search";

    fn next_iter(
        &mut self, problem: &mut Problem<O>, state: SigmaState,
    ) -> Result<(SigmaState, Option<KV>), Error> {
        let candidate = self.candidates[self.cursor];
        self.cursor += 1;

        let cost = problem.cost(&candidate)?;
        let rank = if cost.is_nan() { f64::INFINITY } else { cost };
        match self.best {
            Some((_, best_rank)) if rank >= best_rank => {}
            _ => self.best = Some((candidate, rank)),
        }

        let (best_param, best_rank) = self.best.unwrap_or((candidate, rank));
        Ok((
            state.param(best_param).cost(best_rank),
            Some(kv!("sigma" => candidate; "log_likelihood" => -cost;)),
        ))
    }

    fn terminate(&mut self, _state: &SigmaState) -> TerminationStatus {
        if self.cursor >= self.candidates.len() {
            TerminationStatus::Terminated(TerminationReason::SolverConverged)
        } else {
            TerminationStatus::NotTerminated
        }
    }
}
