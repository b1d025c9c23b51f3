//! On-axis field profiles.

use std::io::{self, Write};

use serde::Serialize;
use thiserror::Error;

/// Errors from constructing or transforming a [`FieldProfile`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldError {
    #[error("field profile is empty")]
    Empty,

    #[error("got {positions} positions but {amplitudes} amplitudes")]
    LengthMismatch { positions: usize, amplitudes: usize },

    #[error("non-finite sample at index {index}")]
    NonFinite { index: usize },

    #[error("positions must strictly increase (index {index})")]
    NotIncreasing { index: usize },

    #[error("field is zero everywhere")]
    ZeroField,
}

/// One on-axis sample: position in cm, amplitude in MV/m.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSample {
    pub position: f64,
    pub amplitude: f64,
}

/// A validated on-axis field profile.
///
/// Samples are non-empty, finite, and ordered by strictly increasing position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldProfile {
    samples: Vec<FieldSample>,
}

impl FieldProfile {
    /// Creates a profile from samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the samples are empty, non-finite, or not strictly
    /// increasing in position.
    pub fn new(samples: Vec<FieldSample>) -> Result<Self, FieldError> {
        if samples.is_empty() {
            return Err(FieldError::Empty);
        }
        for (index, sample) in samples.iter().enumerate() {
            if !sample.position.is_finite() || !sample.amplitude.is_finite() {
                return Err(FieldError::NonFinite { index });
            }
            if index > 0 && sample.position <= samples[index - 1].position {
                return Err(FieldError::NotIncreasing { index });
            }
        }
        Ok(Self { samples })
    }

    /// Creates a profile from parallel position and amplitude columns.
    ///
    /// # Errors
    ///
    /// Returns an error if the columns differ in length or fail
    /// [`FieldProfile::new`] validation.
    pub fn from_columns(positions: &[f64], amplitudes: &[f64]) -> Result<Self, FieldError> {
        if positions.len() != amplitudes.len() {
            return Err(FieldError::LengthMismatch {
                positions: positions.len(),
                amplitudes: amplitudes.len(),
            });
        }
        Self::new(
            positions
                .iter()
                .zip(amplitudes)
                .map(|(&position, &amplitude)| FieldSample {
                    position,
                    amplitude,
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn samples(&self) -> &[FieldSample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; a validated profile has at least one sample.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the amplitude column.
    #[must_use]
    pub fn amplitudes(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.amplitude).collect()
    }

    /// Returns the largest (signed) amplitude.
    #[must_use]
    pub fn max_amplitude(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.amplitude)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Returns the head-field ratio `nu`: the first sample over the maximum.
    ///
    /// The first sample sits on the cathode, so this is the cathode field
    /// relative to the peak field. Independent of peak detection.
    ///
    /// Returns `None` when no sample is positive, since the ratio has no
    /// meaningful sign or scale then.
    #[must_use]
    pub fn head_ratio(&self) -> Option<f64> {
        let max = self.max_amplitude();
        (max > 0.0).then(|| self.samples[0].amplitude / max)
    }

    /// Converts the profile to the form particle-tracking codes read.
    ///
    /// Positions go from cm to m. The sign is flipped if the first sample is
    /// negative, then amplitudes are divided by the largest magnitude.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::ZeroField`] if every amplitude is zero.
    pub fn normalized_for_tracking(&self) -> Result<TrackingMap, FieldError> {
        let sign = if self.samples[0].amplitude < 0.0 {
            -1.0
        } else {
            1.0
        };
        let scale = self
            .samples
            .iter()
            .map(|s| s.amplitude.abs())
            .fold(0.0, f64::max);
        if scale == 0.0 {
            return Err(FieldError::ZeroField);
        }

        Ok(TrackingMap {
            rows: self
                .samples
                .iter()
                .map(|s| [s.position / 100.0, sign * s.amplitude / scale])
                .collect(),
        })
    }
}

/// A normalized field map: position in m, field relative to its peak.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingMap {
    rows: Vec<[f64; 2]>,
}

impl TrackingMap {
    #[must_use]
    pub fn rows(&self) -> &[[f64; 2]] {
        &self.rows
    }

    /// Writes the map as two whitespace-separated columns in `%.6e` notation.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for [z, e] in &self.rows {
            writeln!(writer, "{} {}", scientific(*z), scientific(*e))?;
        }
        writer.flush()
    }
}

/// Formats like C's `%.6e`: six mantissa digits and a signed two-digit exponent.
fn scientific(value: f64) -> String {
    let formatted = format!("{value:.6e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exponent.abs())
        }
        None => formatted,
    }
}
