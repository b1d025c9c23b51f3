use gunfish_core::EquationProblem;
use thiserror::Error;

use crate::{
    adapter::{CavityRequest, RunId, SimulationOutput},
    analyzer::{FieldAnalyzer, PeakMismatch},
    geometry::{CavityDesign, GeometryError},
    observables::ObservableSet,
};

/// Errors from mapping radii to a request or a run to residuals.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProblemError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    PeakMismatch(#[from] PeakMismatch),

    #[error("{residuals} residuals for {variables} parameters")]
    NotSquare { variables: usize, residuals: usize },
}

/// Tunes cell radii for the design frequency and equal cell peaks.
///
/// For radii `x` the residual vector is
///
/// ```text
/// y[0]     = f_sim / f_design - 1
/// y[i + 1] = peak[i + 1] / peak[0] - 1
/// ```
///
/// which has one entry per radius. A run whose field does not show exactly one
/// peak per cell has no meaningful residual and fails with
/// [`ProblemError::PeakMismatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct FlatnessProblem {
    design: CavityDesign,
    analyzer: FieldAnalyzer,
}

impl FlatnessProblem {
    #[must_use]
    pub fn new(design: CavityDesign, analyzer: FieldAnalyzer) -> Self {
        Self { design, analyzer }
    }

    #[must_use]
    pub fn design(&self) -> &CavityDesign {
        &self.design
    }

    /// Returns the number of field peaks a valid run shows.
    #[must_use]
    pub fn expected_peaks(&self) -> usize {
        self.design.parameter_count()
    }

    /// Returns the observables of a run, including flatness and head ratio.
    ///
    /// # Errors
    ///
    /// Returns [`PeakMismatch`] if the run does not show one peak per cell.
    pub fn observables(&self, output: &SimulationOutput) -> Result<ObservableSet, PeakMismatch> {
        self.analyzer.analyze(output, self.expected_peaks())
    }
}

impl EquationProblem for FlatnessProblem {
    type Input = CavityRequest;
    type Output = SimulationOutput;
    type Error = ProblemError;

    fn input(&self, x: &[f64]) -> Result<CavityRequest, ProblemError> {
        Ok(CavityRequest {
            geometry: self.design.build(x)?,
            run: RunId::new(self.design.name(), x),
        })
    }

    fn residuals(
        &self,
        input: &CavityRequest,
        output: &SimulationOutput,
    ) -> Result<Vec<f64>, ProblemError> {
        let flatness = self
            .analyzer
            .extract(&output.profile, self.expected_peaks())?;

        let mut residuals = Vec::with_capacity(flatness.len() + 1);
        residuals.push(output.observables.frequency / self.design.frequency_mhz() - 1.0);
        residuals.extend(flatness.iter().map(|ratio| ratio - 1.0));

        let variables = input.geometry.radii().len();
        if residuals.len() != variables {
            return Err(ProblemError::NotSquare {
                variables,
                residuals: residuals.len(),
            });
        }

        Ok(residuals)
    }
}
