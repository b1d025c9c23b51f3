use gunfish_core::{Model, Observer};
use gunfish_observers::LogObserver;
use gunfish_solvers::equation::newton::{self, Action, Event, Solution, Status};
use thiserror::Error;

use crate::{
    adapter::{CavityRequest, SimulationOutput},
    analyzer::PeakMismatch,
    geometry::CavityDesign,
    observables::ObservableSet,
    options::TuningOptions,
    problem::FlatnessProblem,
};

/// The outcome of tuning a cavity.
#[derive(Debug, Clone)]
pub struct Tuning {
    /// Solver result; `x` holds the final cell radii.
    pub solution: Solution<CavityRequest, SimulationOutput>,

    /// Observables of the final run.
    pub observables: ObservableSet,
}

/// Errors that abort a tuning run.
#[derive(Debug, Error)]
pub enum TuneError {
    #[error("tuning failed")]
    Solver(#[from] newton::Error),

    #[error("final run has no valid field analysis")]
    Analysis(#[from] PeakMismatch),
}

/// Tunes the cell radii of `design` starting from `initial_guess`.
///
/// Progress is logged through [`LogObserver`]. A stalled or exhausted seek is
/// not an error; check `solution.status`.
///
/// # Errors
///
/// Returns an error if a simulation run fails, a run shows the wrong number of
/// field peaks, or the Jacobian is singular.
pub fn seek<M>(
    model: &M,
    design: &CavityDesign,
    initial_guess: &[f64],
    options: &TuningOptions,
) -> Result<Tuning, TuneError>
where
    M: Model<Input = CavityRequest, Output = SimulationOutput> + Sync,
{
    seek_observed(model, design, initial_guess, options, ())
}

/// Tunes the cell radii of `design` and forwards solver events to `observer`.
///
/// # Errors
///
/// Returns an error under the same conditions as [`seek`].
pub fn seek_observed<M, Obs>(
    model: &M,
    design: &CavityDesign,
    initial_guess: &[f64],
    options: &TuningOptions,
    mut observer: Obs,
) -> Result<Tuning, TuneError>
where
    M: Model<Input = CavityRequest, Output = SimulationOutput> + Sync,
    Obs: for<'a> Observer<Event<'a, CavityRequest, SimulationOutput>, Action>,
{
    let problem = FlatnessProblem::new(design.clone(), options.analyzer());
    let config = options.solver_config();
    let mut logger = LogObserver::new(design.name());

    log::info!(
        "tuning {} at {} MHz with {} cells from {initial_guess:?}",
        design.name(),
        design.frequency_mhz(),
        design.cell_count(),
    );

    let solution = newton::solve(
        model,
        &problem,
        initial_guess,
        &config,
        |event: &Event<'_, _, _>| {
            logger.observe(event);
            observer.observe(event)
        },
    )?;

    match solution.status {
        Status::Converged => log::info!(
            "{}: converged in {} cycle(s) at {:?}",
            design.name(),
            solution.cycles,
            solution.x
        ),
        Status::Stalled => log::warn!(
            "{}: local best reached in cycle {} but residuals {:?} exceed tolerance",
            design.name(),
            solution.cycles,
            solution.residuals
        ),
        Status::Exhausted => log::warn!(
            "{}: no solution within tolerance in {} cycles",
            design.name(),
            solution.cycles
        ),
        Status::StoppedByObserver => {
            log::info!("{}: stopped in cycle {}", design.name(), solution.cycles);
        }
    }

    let observables = problem.observables(&solution.snapshot.output)?;
    Ok(Tuning {
        solution,
        observables,
    })
}
