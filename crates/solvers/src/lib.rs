//! Numerical solvers for the gunfish workspace.
//!
//! # Modules
//!
//! - [`equation`]: root seeking for square systems of equations whose
//!   residuals come from an expensive [`Model`](gunfish_core::Model)

pub mod equation;
