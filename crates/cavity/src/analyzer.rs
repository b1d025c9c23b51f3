use thiserror::Error;

use crate::{
    adapter::SimulationOutput,
    field::FieldProfile,
    observables::ObservableSet,
    peaks::{DetectorError, PeakDetector},
};

/// The detected peak count differs from the number of cells.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("expected {expected} field peaks, found {found}")]
pub struct PeakMismatch {
    pub expected: usize,
    pub found: usize,
}

/// Extracts per-cell flatness from on-axis field profiles.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldAnalyzer {
    detector: PeakDetector,
}

impl FieldAnalyzer {
    /// Creates an analyzer with the given peak detector settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `lookahead` is zero or `delta` is invalid.
    pub fn new(lookahead: usize, delta: f64) -> Result<Self, DetectorError> {
        Ok(Self {
            detector: PeakDetector::new(lookahead, delta)?,
        })
    }

    #[must_use]
    pub fn detector(&self) -> PeakDetector {
        self.detector
    }

    /// Returns the flatness vector: every peak after the first divided by the
    /// first.
    ///
    /// The result has `expected_peaks - 1` entries.
    ///
    /// # Errors
    ///
    /// Returns [`PeakMismatch`] if the number of detected peaks is not
    /// `expected_peaks`. A mismatch is also logged at `warn`.
    pub fn extract(
        &self,
        profile: &FieldProfile,
        expected_peaks: usize,
    ) -> Result<Vec<f64>, PeakMismatch> {
        let peaks = self.detector.detect(&profile.amplitudes());

        if peaks.len() != expected_peaks || peaks.is_empty() {
            log::warn!(
                "peak count mismatch: expected {expected_peaks}, found {}",
                peaks.len()
            );
            return Err(PeakMismatch {
                expected: expected_peaks,
                found: peaks.len(),
            });
        }

        let reference = peaks[0].value;
        Ok(peaks[1..].iter().map(|p| p.value / reference).collect())
    }

    /// Combines a run's scalar observables with its field analysis.
    ///
    /// # Errors
    ///
    /// Returns [`PeakMismatch`] under the same conditions as
    /// [`FieldAnalyzer::extract`].
    pub fn analyze(
        &self,
        output: &SimulationOutput,
        expected_peaks: usize,
    ) -> Result<ObservableSet, PeakMismatch> {
        Ok(ObservableSet {
            observables: output.observables,
            flatness: self.extract(&output.profile, expected_peaks)?,
            head_ratio: output.profile.head_ratio(),
        })
    }
}
