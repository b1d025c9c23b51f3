//! Damped quasi-Newton root seeking with a forward-difference Jacobian.
//!
//! # Algorithm
//!
//! Each cycle evaluates the residual vector `y` at the current point `x`. If
//! every `|y_i|` is within tolerance the solver stops. Otherwise it estimates
//! the Jacobian `J` column by column with forward differences, solves
//! `J · dx = y`, and moves to `x - η · dx` where `η` is the relaxation factor.
//!
//! Every point handed to the model is quantized to a fixed number of decimals
//! first. Two points that quantize to the same value are the same point, so an
//! expensive model whose results are cached by input is never rerun for noise
//! below the quantum. It also gives the solver a clean stall test: if the next
//! quantized point equals the current one, no further progress is possible.
//!
//! # When to Use
//!
//! - The system is square (as many residuals as variables)
//! - Each model call is expensive and derivatives are unavailable
//! - A reasonable initial guess exists near a root
//!
//! # Cost
//!
//! A cycle that does not converge costs `1 + n` model calls for `n`
//! variables. With `max_cycles = k` the solver makes at most `k + 1` base
//! evaluations. The `n` Jacobian probes of a cycle are independent of each
//! other and run in parallel unless [`Config::with_parallel`] disables it.
//!
//! # Observer Events
//!
//! - [`Event::Evaluated`]: the base point of a cycle was evaluated
//! - [`Event::Probed`]: one Jacobian probe finished (emitted after all probes
//!   of the cycle complete, in dimension order)
//! - [`Event::Stepped`]: the solver is about to move to a new point
//!
//! Observers can return [`Action::StopEarly`] from any event; the solution then
//! reports the most recent base evaluation.

mod action;
mod config;
mod error;
mod event;
mod jacobian;
mod quantize;
mod solution;
mod step;


pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use quantize::{DecimalsError, MAX_DECIMALS, Quantizer};
pub use solution::{Solution, Status};

use gunfish_core::{EquationProblem, Model, Observer};

use crate::equation::{Evaluation, evaluate};

/// Seeks a root of the equation problem starting from `initial`.
///
/// The initial guess is quantized before the first evaluation, so the reported
/// `x` is always a quantized point.
///
/// # Errors
///
/// Returns an error if the guess is empty, the system is not square, a residual
/// is not finite, the Jacobian is singular, or the model or problem fails.
pub fn solve<M, P, Obs>(
    model: &M,
    problem: &P,
    initial: &[f64],
    config: &Config,
    mut observer: Obs,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model + Sync,
    M::Input: Send,
    M::Output: Send,
    P: EquationProblem<Input = M::Input, Output = M::Output> + Sync,
    Obs: for<'a> Observer<Event<'a, M::Input, M::Output>, Action>,
{
    if initial.is_empty() {
        return Err(Error::EmptyGuess);
    }

    let quantizer = config.quantizer();
    let mut x = quantizer.apply(initial);
    let mut cycle = 0;

    loop {
        let eval = checked_evaluate(model, problem, x)?;

        let event = Event::Evaluated { cycle, eval: &eval };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(Solution::from_eval(eval, Status::StoppedByObserver, cycle));
        }

        if eval.max_residual() <= config.tolerance() {
            return Ok(Solution::from_eval(eval, Status::Converged, cycle));
        }

        let estimate = jacobian::estimate(model, problem, &eval, config)?;

        let mut stop = false;
        for (dimension, probe) in estimate.probes.iter().enumerate() {
            let event = Event::Probed {
                cycle,
                dimension,
                eval: probe,
            };
            if let Some(Action::StopEarly) = observer.observe(&event) {
                stop = true;
                break;
            }
        }
        if stop {
            return Ok(Solution::from_eval(eval, Status::StoppedByObserver, cycle));
        }

        let dx = step::solve_linear(&estimate.matrix, &eval.residuals)
            .ok_or(Error::SingularJacobian { cycle })?;

        let next: Vec<f64> = eval
            .x
            .iter()
            .zip(&dx)
            .map(|(xi, dxi)| quantizer.value(xi - config.relaxation() * dxi))
            .collect();

        if next == eval.x {
            return Ok(Solution::from_eval(eval, Status::Stalled, cycle));
        }

        if cycle >= config.max_cycles() {
            return Ok(Solution::from_eval(eval, Status::Exhausted, cycle));
        }

        let event = Event::Stepped {
            cycle,
            from: &eval.x,
            to: &next,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(Solution::from_eval(eval, Status::StoppedByObserver, cycle));
        }

        x = next;
        cycle += 1;
    }
}

/// Seeks a root without observer support.
///
/// This is a convenience wrapper around [`solve`] that uses a no-op observer.
///
/// # Errors
///
/// Returns an error under the same conditions as [`solve`].
pub fn solve_unobserved<M, P>(
    model: &M,
    problem: &P,
    initial: &[f64],
    config: &Config,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model + Sync,
    M::Input: Send,
    M::Output: Send,
    P: EquationProblem<Input = M::Input, Output = M::Output> + Sync,
{
    solve(model, problem, initial, config, ())
}

/// Evaluates `x` and rejects non-square or non-finite residual vectors.
fn checked_evaluate<M, P>(
    model: &M,
    problem: &P,
    x: Vec<f64>,
) -> Result<Evaluation<M::Input, M::Output>, Error>
where
    M: Model,
    P: EquationProblem<Input = M::Input, Output = M::Output>,
{
    let eval = evaluate(model, problem, x)?;

    if eval.residuals.len() != eval.x.len() {
        return Err(Error::NotSquare {
            variables: eval.x.len(),
            residuals: eval.residuals.len(),
        });
    }
    if !eval.is_finite() {
        return Err(Error::NonFiniteResidual { x: eval.x });
    }

    Ok(eval)
}
