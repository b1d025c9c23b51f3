//! Capability traits for cross-solver observers.
//!
//! These traits abstract over solver-specific event and action types, enabling
//! observers to work generically across solvers.
//!
//! # Event traits
//!
//! - [`HasResidual`]: events that carry a residual value
//!
//! # Action traits
//!
//! - [`CanStopEarly`]: actions that can signal early termination
//!
//! # Example
//!
//! An observer that gives up once the residual stops improving, written once
//! for any solver whose events and actions implement these traits:
//!
//! ```rust
//! use gunfish_core::Observer;
//! use gunfish_observers::traits::{CanStopEarly, HasResidual};
//!
//! struct Patience {
//!     best: f64,
//!     misses: usize,
//!     limit: usize,
//! }
//!
//! impl<E: HasResidual, A: CanStopEarly> Observer<E, A> for Patience {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         let residual = event.residual();
//!         if residual.is_nan() {
//!             return None;
//!         }
//!         if residual < self.best {
//!             self.best = residual;
//!             self.misses = 0;
//!             return None;
//!         }
//!         self.misses += 1;
//!         (self.misses >= self.limit).then(A::stop_early)
//!     }
//! }
//! ```

use gunfish_solvers::equation::newton;

/// An event that carries a residual value.
pub trait HasResidual {
    /// Returns the residual for this event.
    ///
    /// Returns `f64::NAN` when the event carries no evaluation.
    fn residual(&self) -> f64;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

// --- HasResidual for newton::Event ---

/// The residual of a Newton event is the largest residual magnitude.
impl<I, O> HasResidual for newton::Event<'_, I, O> {
    fn residual(&self) -> f64 {
        self.eval().map_or(f64::NAN, |eval| eval.max_residual())
    }
}

// --- CanStopEarly impls ---

impl CanStopEarly for newton::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gunfish_core::Snapshot;
    use gunfish_solvers::equation::Evaluation;

    #[test]
    fn newton_residual_is_max_magnitude() {
        let eval = Evaluation {
            x: vec![1.0, 2.0],
            residuals: vec![0.2, -0.7],
            snapshot: Snapshot::new((), ()),
        };

        let event = newton::Event::Evaluated {
            cycle: 0,
            eval: &eval,
        };
        assert_eq!(event.residual(), 0.7);

        let stepped: newton::Event<'_, (), ()> = newton::Event::Stepped {
            cycle: 0,
            from: &[1.0],
            to: &[2.0],
        };
        assert!(stepped.residual().is_nan());
    }

    #[test]
    fn newton_action_stops_early() {
        assert_eq!(newton::Action::stop_early(), newton::Action::StopEarly);
    }
}
