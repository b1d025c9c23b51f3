//! Core traits and types for the gunfish workspace.
//!
//! This crate defines the shared abstractions that solvers, observers, and
//! cavity models build on:
//!
//! - [`Model`]: a callable that maps a typed input to a typed output, such as
//!   one run of an external field solver
//! - [`Snapshot`]: a captured input/output pair from a model call
//! - [`Observer`]: receives solver events and optionally returns control actions
//! - [`EquationProblem`]: adapts solver variables to model inputs and turns
//!   model outputs into residuals
//! - [`Guarded`]: wraps a model with a [`CancelToken`] and an optional deadline

mod guard;
mod model;
mod observer;
mod problem;

pub use guard::{CancelToken, GuardError, Guarded};
pub use observer::Observer;
pub use problem::EquationProblem;
pub use {model::Model, model::Snapshot};
