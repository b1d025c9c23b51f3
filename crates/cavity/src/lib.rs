//! RF gun cavity tuning.
//!
//! A gun cavity is a half cell followed by full cells and an exit drift. This
//! crate tunes the cell radii until an external field solver reports the
//! design frequency and equal on-axis field peaks in every cell.
//!
//! The pieces map onto the gunfish abstractions:
//!
//! - [`CavityDesign::build`] turns radii into an immutable [`CavityGeometry`]
//! - a [`Model`](gunfish_core::Model) from [`CavityRequest`] to
//!   [`SimulationOutput`] runs the solver; [`SuperfishAdapter`] is one
//! - [`FieldAnalyzer`] extracts flatness from the on-axis field
//! - [`FlatnessProblem`] turns a run into the residual vector
//! - [`seek`] drives the residuals to zero with the Newton solver
//!
//! Lengths are in cm, fields in MV/m, frequencies in MHz.

mod adapter;
mod analyzer;
mod field;
mod geometry;
mod observables;
mod options;
mod problem;
mod tune;

pub mod peaks;
pub mod superfish;

pub use adapter::{
    CavityRequest, FIELD_LISTING, RunId, Runner, SimulationError, SimulationOutput,
    SuperfishAdapter,
};
pub use analyzer::{FieldAnalyzer, PeakMismatch};
pub use field::{FieldError, FieldProfile, FieldSample, TrackingMap};
pub use geometry::{CavityDesign, CavityGeometry, GeometryError, Segment};
pub use observables::{ObservableSet, Observables};
pub use options::{OptionsError, TuningOptions};
pub use problem::{FlatnessProblem, ProblemError};
pub use tune::{TuneError, Tuning, seek, seek_observed};
