use gunfish_core::{EquationProblem, Model};
use nalgebra::DMatrix;
use rayon::prelude::*;

use crate::equation::{Evaluation, evaluate};

use super::{Config, Error};

/// A forward-difference Jacobian and the probe evaluations behind it.
pub(super) struct Estimate<I, O> {
    pub(super) matrix: DMatrix<f64>,
    pub(super) probes: Vec<Evaluation<I, O>>,
}

/// Estimates the Jacobian at `base` with one quantized probe per dimension.
///
/// Column `i` is `(y(x + h·eᵢ) - y(x)) / h`, where `h` is the displacement
/// actually taken after quantizing the probe point.
pub(super) fn estimate<M, P>(
    model: &M,
    problem: &P,
    base: &Evaluation<M::Input, M::Output>,
    config: &Config,
) -> Result<Estimate<M::Input, M::Output>, Error>
where
    M: Model + Sync,
    M::Input: Send,
    M::Output: Send,
    P: EquationProblem<Input = M::Input, Output = M::Output> + Sync,
{
    let origin = base.x.as_slice();
    let n = origin.len();

    let probe = |dimension: usize| -> Result<(f64, Evaluation<M::Input, M::Output>), Error> {
        let mut x = origin.to_vec();
        x[dimension] = config.quantizer().value(origin[dimension] + config.step());

        let h = x[dimension] - origin[dimension];
        if h == 0.0 {
            return Err(Error::DegenerateProbe { dimension });
        }

        let eval = evaluate(model, problem, x)?;
        if eval.residuals.len() != n {
            return Err(Error::NotSquare {
                variables: n,
                residuals: eval.residuals.len(),
            });
        }
        if !eval.is_finite() {
            return Err(Error::NonFiniteResidual { x: eval.x });
        }
        Ok((h, eval))
    };

    let results: Vec<_> = if config.parallel() {
        (0..n).into_par_iter().map(probe).collect()
    } else {
        (0..n).map(probe).collect()
    };

    let mut matrix = DMatrix::zeros(n, n);
    let mut probes = Vec::with_capacity(n);

    for (dimension, result) in results.into_iter().enumerate() {
        let (h, eval) = result?;
        for (row, (y_probe, y_base)) in eval.residuals.iter().zip(&base.residuals).enumerate() {
            matrix[(row, dimension)] = (y_probe - y_base) / h;
        }
        probes.push(eval);
    }

    Ok(Estimate { matrix, probes })
}
