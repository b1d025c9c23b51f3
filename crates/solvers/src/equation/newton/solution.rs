use gunfish_core::Snapshot;

use crate::equation::Evaluation;

/// Why the Newton solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Every residual is within tolerance.
    Converged,

    /// The next quantized point equals the current one.
    Stalled,

    /// Reached the cycle limit without converging.
    Exhausted,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of a Newton seek.
#[derive(Debug, Clone)]
pub struct Solution<I, O> {
    /// Final solver status.
    pub status: Status,

    /// The last evaluated base point.
    pub x: Vec<f64>,

    /// Residuals at `x`.
    pub residuals: Vec<f64>,

    /// Snapshot at `x`.
    pub snapshot: Snapshot<I, O>,

    /// Cycle count when the solver finished.
    pub cycles: usize,
}

impl<I, O> Solution<I, O> {
    pub(super) fn from_eval(eval: Evaluation<I, O>, status: Status, cycles: usize) -> Self {
        Self {
            status,
            x: eval.x,
            residuals: eval.residuals,
            snapshot: eval.snapshot,
            cycles,
        }
    }

    /// Returns true if the solver converged.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.status == Status::Converged
    }
}
