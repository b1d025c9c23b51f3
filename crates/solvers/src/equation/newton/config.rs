use thiserror::Error;

use super::quantize::{DecimalsError, Quantizer};

/// Configuration for the Newton solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    max_cycles: usize,
    tolerance: f64,
    relaxation: f64,
    step: f64,
    quantizer: Quantizer,
    parallel: bool,
}

/// Errors that can occur when validating a Newton solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("tolerance must be finite and positive")]
    Tolerance,

    #[error("relaxation must be finite and in (0, 1]")]
    Relaxation,

    #[error("step must be finite and positive")]
    Step,

    #[error("step {step} is smaller than the quantum {quantum}")]
    StepBelowQuantum { step: f64, quantum: f64 },

    #[error(transparent)]
    Decimals(#[from] DecimalsError),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_cycles: 100,
            tolerance: 1e-3,
            relaxation: 0.5,
            step: 1e-3,
            quantizer: Quantizer::with_scale(4),
            parallel: true,
        }
    }
}

impl Config {
    /// Creates a new config with validated parameters.
    ///
    /// Probes move one coordinate by `step` and then quantize, so `step` must
    /// be at least one quantum or the probe could land back on the base point.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is out of range or non-finite.
    pub fn new(
        max_cycles: usize,
        tolerance: f64,
        relaxation: f64,
        step: f64,
        decimals: u32,
    ) -> Result<Self, ConfigError> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ConfigError::Tolerance);
        }
        if !relaxation.is_finite() || relaxation <= 0.0 || relaxation > 1.0 {
            return Err(ConfigError::Relaxation);
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(ConfigError::Step);
        }

        let quantizer = Quantizer::new(decimals)?;
        let quantum = quantizer.quantum();

        // Compare in quantum units so `step == quantum` survives float noise.
        if (step / quantum) < 1.0 - 1e-9 {
            return Err(ConfigError::StepBelowQuantum { step, quantum });
        }

        Ok(Self {
            max_cycles,
            tolerance,
            relaxation,
            step,
            quantizer,
            parallel: true,
        })
    }

    /// Enables or disables parallel Jacobian probes.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Returns the maximum number of Newton steps.
    #[must_use]
    pub fn max_cycles(&self) -> usize {
        self.max_cycles
    }

    /// Returns the residual tolerance (applied to every component).
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the relaxation factor η applied to each Newton step.
    #[must_use]
    pub fn relaxation(&self) -> f64 {
        self.relaxation
    }

    /// Returns the forward-difference step.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Returns the quantizer applied to every evaluated point.
    #[must_use]
    pub fn quantizer(&self) -> Quantizer {
        self.quantizer
    }

    /// Returns true if Jacobian probes run in parallel.
    #[must_use]
    pub fn parallel(&self) -> bool {
        self.parallel
    }
}
