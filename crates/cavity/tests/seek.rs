mod common;

use approx::assert_relative_eq;
use gunfish_cavity::{
    CavityDesign, CavityRequest, ProblemError, SimulationOutput, TuneError, TuningOptions, seek,
    seek_observed,
};
use gunfish_core::{CancelToken, GuardError, Guarded, Model, Observer};
use gunfish_observers::HistoryObserver;
use gunfish_solvers::equation::newton::{self, Event, Quantizer, Status};

use common::{LinearCavity, output};

fn s_band() -> CavityDesign {
    CavityDesign::from_mhz("e-gun", 2856.0, 1.6).expect("valid design")
}

fn quantized_guess(design: &CavityDesign) -> Vec<f64> {
    Quantizer::new(4)
        .expect("valid decimals")
        .apply(&design.initial_guess())
}

#[test]
fn on_target_guess_converges_at_cycle_zero() {
    let design = s_band();
    let x0 = quantized_guess(&design);
    let cavity = LinearCavity::new(2856.0, [x0[0], x0[1]]);

    let tuning = seek(&cavity, &design, &design.initial_guess(), &TuningOptions::default())
        .expect("tunes");

    assert_eq!(tuning.solution.status, Status::Converged);
    assert_eq!(tuning.solution.cycles, 0);
    assert_eq!(tuning.solution.x, x0);
    assert_eq!(tuning.solution.residuals, vec![0.0, 0.0]);
    assert_eq!(tuning.observables.flatness, vec![1.0]);
    assert_eq!(cavity.calls(), 1);
}

#[test]
fn tunes_radii_to_target() {
    let design = s_band();
    let cavity = LinearCavity::new(2856.0, [4.05, 3.95]);
    let options = TuningOptions::default();

    let tuning =
        seek(&cavity, &design, &design.initial_guess(), &options).expect("tunes");

    assert_eq!(tuning.solution.status, Status::Converged);
    assert!(tuning.solution.residuals.iter().all(|y| y.abs() <= options.tolerance));
    assert_relative_eq!(tuning.solution.x[0], 4.05, epsilon = 5e-3);
    assert_relative_eq!(tuning.solution.x[1], 3.95, epsilon = 5e-3);
    assert_relative_eq!(
        tuning.observables.observables.frequency,
        2856.0,
        max_relative = 1e-3
    );

    // Each cycle costs one base run and one probe per radius.
    assert_eq!(cavity.calls(), 3 * tuning.solution.cycles + 1);
}

#[test]
fn small_cycle_budget_is_exhausted() {
    let design = s_band();
    let cavity = LinearCavity::new(2856.0, [4.05, 3.95]);
    let options = TuningOptions {
        max_cycles: 2,
        ..TuningOptions::default()
    };

    let tuning =
        seek(&cavity, &design, &design.initial_guess(), &options).expect("runs");

    assert_eq!(tuning.solution.status, Status::Exhausted);
    assert_eq!(tuning.solution.cycles, 2);
    assert_eq!(tuning.solution.x.len(), 2);
    assert!(cavity.calls() <= 3 * (options.max_cycles + 1));
}

#[test]
fn history_tracks_each_cycle() {
    let design = s_band();
    let cavity = LinearCavity::new(2856.0, [4.05, 3.95]);
    let mut history = HistoryObserver::default();

    let tuning = seek_observed(
        &cavity,
        &design,
        &design.initial_guess(),
        &TuningOptions::default(),
        |event: &Event<'_, _, _>| history.observe(event),
    )
    .expect("tunes");

    let records = history.records();
    assert_eq!(records.len(), tuning.solution.cycles + 1);
    assert_eq!(history.evaluations(), cavity.calls());

    // Residuals shrink from cycle to cycle on a linear cavity.
    for pair in records.windows(2) {
        assert!(pair[1].max_residual() < pair[0].max_residual());
    }
}

/// Returns three field peaks regardless of the geometry.
struct ExtraPeak;

impl Model for ExtraPeak {
    type Input = CavityRequest;
    type Output = SimulationOutput;
    type Error = std::convert::Infallible;

    fn call(&self, _request: &CavityRequest) -> Result<SimulationOutput, Self::Error> {
        Ok(output(2856.0, &[1.0, 1.0, 1.0]))
    }
}

#[test]
fn peak_mismatch_aborts_the_seek() {
    let design = s_band();

    let result = seek(
        &ExtraPeak,
        &design,
        &design.initial_guess(),
        &TuningOptions::default(),
    );

    let Err(TuneError::Solver(newton::Error::Problem(source))) = result else {
        panic!("expected a problem error");
    };
    assert!(matches!(
        source.downcast_ref::<ProblemError>(),
        Some(ProblemError::PeakMismatch(_))
    ));
}

#[test]
fn cancelled_guard_aborts_the_seek() {
    let design = s_band();
    let token = CancelToken::new();
    let cavity = Guarded::new(LinearCavity::new(2856.0, [4.05, 3.95]), token.clone());
    token.cancel();

    let result = seek(
        &cavity,
        &design,
        &design.initial_guess(),
        &TuningOptions::default(),
    );

    let Err(TuneError::Solver(newton::Error::Model(source))) = result else {
        panic!("expected a model error");
    };
    assert!(matches!(
        source.downcast_ref::<GuardError<std::convert::Infallible>>(),
        Some(GuardError::Cancelled)
    ));
    assert_eq!(cavity.into_inner().calls(), 0);
}
