//! Solvers for equation problems: finding roots of systems of equations.
//!
//! An [`EquationProblem`] maps solver variables `x` to model inputs, calls the
//! model, and computes residuals. Solvers in this module drive those residuals
//! toward zero.
//!
//! # Solvers
//!
//! - [`newton`]: damped quasi-Newton iteration with a forward-difference
//!   Jacobian and quantized iterates
//!
//! [`EquationProblem`]: gunfish_core::EquationProblem

mod evaluate;

pub use evaluate::{EvalError, EvaluateResult, Evaluation, evaluate};

pub mod newton;
