use std::error::Error as StdError;

use thiserror::Error;

use crate::equation::EvalError;

/// Errors that can occur during a Newton seek.
#[derive(Debug, Error)]
pub enum Error {
    #[error("initial guess is empty")]
    EmptyGuess,

    #[error("system is not square: {variables} variables but {residuals} residuals")]
    NotSquare { variables: usize, residuals: usize },

    #[error("non-finite residual at x = {x:?}")]
    NonFiniteResidual { x: Vec<f64> },

    #[error("jacobian is singular or ill-conditioned at cycle {cycle}")]
    SingularJacobian { cycle: usize },

    #[error("probe step for dimension {dimension} vanished after quantization")]
    DegenerateProbe { dimension: usize },

    #[error("problem error")]
    Problem(#[source] Box<dyn StdError + Send + Sync>),

    #[error("model call failed")]
    Model(#[source] Box<dyn StdError + Send + Sync>),
}

impl<ME, PE> From<EvalError<ME, PE>> for Error
where
    ME: StdError + Send + Sync + 'static,
    PE: StdError + Send + Sync + 'static,
{
    fn from(err: EvalError<ME, PE>) -> Self {
        match err {
            EvalError::Model(e) => Self::Model(Box::new(e)),
            EvalError::Problem(e) => Self::Problem(Box::new(e)),
        }
    }
}
