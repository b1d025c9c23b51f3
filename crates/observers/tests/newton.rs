use std::convert::Infallible;

use approx::assert_relative_eq;
use gunfish_core::{EquationProblem, Model, Observer};
use gunfish_observers::{
    HistoryObserver, LogObserver,
    traits::{CanStopEarly, HasResidual},
};
use gunfish_solvers::equation::newton::{self, Config, Event, Status};

/// Model `(x0² - 2, x1 - x0)`, root at `(√2, √2)`.
struct SqrtTwo;

impl Model for SqrtTwo {
    type Input = Vec<f64>;
    type Output = Vec<f64>;
    type Error = Infallible;

    fn call(&self, x: &Vec<f64>) -> Result<Vec<f64>, Infallible> {
        Ok(vec![x[0] * x[0] - 2.0, x[1] - x[0]])
    }
}

struct Residuals;

impl EquationProblem for Residuals {
    type Input = Vec<f64>;
    type Output = Vec<f64>;
    type Error = Infallible;

    fn input(&self, x: &[f64]) -> Result<Vec<f64>, Infallible> {
        Ok(x.to_vec())
    }

    fn residuals(&self, _input: &Vec<f64>, output: &Vec<f64>) -> Result<Vec<f64>, Infallible> {
        Ok(output.clone())
    }
}

/// Stops once the residual falls under a threshold looser than the solver's.
struct GoodEnough(f64);

impl<E: HasResidual, A: CanStopEarly> Observer<E, A> for GoodEnough {
    fn observe(&mut self, event: &E) -> Option<A> {
        (event.residual() < self.0).then(A::stop_early)
    }
}

#[test]
fn history_records_every_cycle() {
    let mut history = HistoryObserver::default();
    let mut logger = LogObserver::new("sqrt-two");
    let config = Config::new(50, 1e-3, 1.0, 1e-3, 4).expect("valid config");

    let solution = newton::solve(
        &SqrtTwo,
        &Residuals,
        &[1.0, 1.0],
        &config,
        |event: &Event<'_, _, _>| {
            logger.observe(event);
            history.observe(event)
        },
    )
    .expect("should converge");

    assert_eq!(solution.status, Status::Converged);
    assert_relative_eq!(solution.x[0], 2.0_f64.sqrt(), epsilon = 1e-3);

    let records = history.records();
    assert_eq!(records.len(), solution.cycles + 1);
    assert_eq!(records[0].x, vec![1.0, 1.0]);
    assert_eq!(records.last().map(|r| r.x.clone()), Some(solution.x.clone()));
    assert_eq!(history.probes(), 2 * solution.cycles);
    assert!(records.last().is_some_and(|r| r.max_residual() <= 1e-3));
}

#[test]
fn capability_observer_stops_early() {
    let config = Config::new(50, 1e-9, 1.0, 1e-3, 4).expect("valid config");

    let solution = newton::solve(&SqrtTwo, &Residuals, &[1.0, 1.0], &config, GoodEnough(0.1))
        .expect("should stop");

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert!(solution.residuals.iter().all(|r| r.abs() < 0.1));
}
