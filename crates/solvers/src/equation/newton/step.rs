use nalgebra::{DMatrix, DVector};

/// Smallest accepted ratio of the extreme singular values of the Jacobian.
const MIN_RCOND: f64 = 1e-12;

/// Solves `J · dx = y` for the Newton correction.
///
/// Returns `None` if `J` is singular, numerically ill-conditioned, or the
/// solution is not finite.
pub(super) fn solve_linear(jacobian: &DMatrix<f64>, residuals: &[f64]) -> Option<Vec<f64>> {
    let singular_values = jacobian.singular_values();
    let largest = singular_values.iter().copied().fold(0.0_f64, f64::max);
    let smallest = singular_values
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);

    let rcond = smallest / largest;
    if rcond.is_nan() || rcond < MIN_RCOND {
        return None;
    }

    let rhs = DVector::from_column_slice(residuals);
    let dx = jacobian.clone().lu().solve(&rhs)?;

    dx.iter().all(|v| v.is_finite()).then(|| dx.iter().copied().collect())
}
