//! Cavity geometry derived from a design and a vector of cell radii.
//!
//! All lengths are in centimeters. The design frequency sets the free-space
//! wavelength λ, from which every fixed dimension follows:
//!
//! | quantity              | value                                   |
//! |-----------------------|-----------------------------------------|
//! | matched-cell radius a | 2.405 / (2π) · λ                        |
//! | tube radius b         | a / 4                                   |
//! | chamfer/joint radius  | a / 4                                   |
//! | full-cell length      | λ / 2                                   |
//! | half-cell length      | frac(cell count) · λ / 2                |
//! | drift length          | 1.2 · λ / 2                             |
//! | mesh spacing          | λ / 100                                 |
//!
//! The tuned parameters are the cell radii: `x[0]` for the half cell and
//! `x[i + 1]` for full cell `i`.

use std::f64::consts::PI;

use serde::Serialize;
use thiserror::Error;
use uom::si::{
    f64::{Frequency, Length, Velocity},
    frequency::megahertz,
    length::centimeter,
    velocity::meter_per_second,
};

/// First zero of the Bessel function J₀, which fixes the TM₀₁₀ cell radius.
const BESSEL_J0_ZERO: f64 = 2.405;

const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Errors from creating a design or building its geometry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("invalid design: {0}")]
    InvalidDesign(&'static str),

    #[error("expected {expected} cell radii, got {found}")]
    ParameterCount { expected: usize, found: usize },
}

/// The fixed description of a gun cavity: its name, frequency and cell count.
///
/// A cell count of `1.6` means one 0.6-length half cell followed by one full
/// cell. The integer part is the number of full cells.
#[derive(Debug, Clone, PartialEq)]
pub struct CavityDesign {
    name: String,
    frequency: Frequency,
    cell_count: f64,
}

impl CavityDesign {
    /// Creates a design.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidDesign`] if the name is empty or the
    /// frequency or cell count is not finite and positive.
    pub fn new(
        name: impl Into<String>,
        frequency: Frequency,
        cell_count: f64,
    ) -> Result<Self, GeometryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GeometryError::InvalidDesign("name must not be empty"));
        }
        let mhz = frequency.get::<megahertz>();
        if !mhz.is_finite() || mhz <= 0.0 {
            return Err(GeometryError::InvalidDesign(
                "frequency must be finite and positive",
            ));
        }
        if !cell_count.is_finite() || cell_count <= 0.0 {
            return Err(GeometryError::InvalidDesign(
                "cell count must be finite and positive",
            ));
        }

        Ok(Self {
            name,
            frequency,
            cell_count,
        })
    }

    /// Creates a design from a frequency in MHz.
    ///
    /// # Errors
    ///
    /// See [`CavityDesign::new`].
    pub fn from_mhz(
        name: impl Into<String>,
        frequency_mhz: f64,
        cell_count: f64,
    ) -> Result<Self, GeometryError> {
        Self::new(name, Frequency::new::<megahertz>(frequency_mhz), cell_count)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Returns the design frequency in MHz.
    #[must_use]
    pub fn frequency_mhz(&self) -> f64 {
        self.frequency.get::<megahertz>()
    }

    #[must_use]
    pub fn cell_count(&self) -> f64 {
        self.cell_count
    }

    /// Returns the number of full cells.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn full_cells(&self) -> usize {
        self.cell_count.trunc() as usize
    }

    /// Returns the number of tuned radii, one per cell including the half cell.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.full_cells() + 1
    }

    /// Returns the free-space wavelength at the design frequency.
    #[must_use]
    pub fn wavelength(&self) -> Length {
        Velocity::new::<meter_per_second>(SPEED_OF_LIGHT) / self.frequency
    }

    /// Returns the free-space wavelength in cm.
    #[must_use]
    pub fn wavelength_cm(&self) -> f64 {
        self.wavelength().get::<centimeter>()
    }

    /// Returns the matched-cell radius `a` in cm.
    #[must_use]
    pub fn matched_radius(&self) -> f64 {
        BESSEL_J0_ZERO / (2.0 * PI) * self.wavelength_cm()
    }

    /// Returns the starting radii: the matched radius for every cell.
    #[must_use]
    pub fn initial_guess(&self) -> Vec<f64> {
        vec![self.matched_radius(); self.parameter_count()]
    }

    /// Returns the coupler drive point `(x, y)` in cm.
    #[must_use]
    pub fn drive_point(&self) -> (f64, f64) {
        let half_wave = self.wavelength_cm() / 2.0;
        let x = (self.cell_count - (self.cell_count / 2.0).trunc() - 0.5) * half_wave;
        let y = self.matched_radius() / 2.0;
        (x, y)
    }

    /// Builds the cavity geometry for the given cell radii.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ParameterCount`] if `radii` does not hold
    /// exactly one radius per cell.
    pub fn build(&self, radii: &[f64]) -> Result<CavityGeometry, GeometryError> {
        let expected = self.parameter_count();
        if radii.len() != expected {
            return Err(GeometryError::ParameterCount {
                expected,
                found: radii.len(),
            });
        }

        let lambda = self.wavelength_cm();
        let a = self.matched_radius();
        let tube = a / 4.0;
        let round = a / 4.0;
        let full_length = lambda / 2.0;
        let half_length = self.cell_count.fract() * full_length;
        let mesh = lambda / 100.0;
        let (drive_x, drive_y) = self.drive_point();

        let mut segments = Vec::with_capacity(expected + 3);
        segments.push(Segment::Title {
            title: self.name.clone(),
        });
        segments.push(Segment::Setting {
            frequency: self.frequency_mhz(),
            drive_x,
            drive_y,
            mesh_dx: mesh,
            mesh_dy: mesh,
        });
        segments.push(Segment::HalfCell {
            length: half_length,
            radius: radii[0],
            chamfer: round,
            joint: round,
            tube_radius: tube,
        });

        let mut start = half_length;
        for &radius in &radii[1..] {
            segments.push(Segment::FullCell {
                start,
                length: full_length,
                radius,
                chamfer: round,
                joint_left: round,
                joint_right: round,
                tube_left: tube,
                tube_right: tube,
            });
            start += full_length;
        }

        segments.push(Segment::Drift {
            start,
            length: 1.2 * full_length,
            radius_left: tube,
            radius_right: tube,
        });

        Ok(CavityGeometry { segments })
    }
}

/// One element of a cavity description, in deck order.
///
/// Lengths and radii are in cm; `Setting::frequency` is in MHz.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Title {
        title: String,
    },
    Setting {
        frequency: f64,
        drive_x: f64,
        drive_y: f64,
        mesh_dx: f64,
        mesh_dy: f64,
    },
    HalfCell {
        length: f64,
        radius: f64,
        chamfer: f64,
        joint: f64,
        tube_radius: f64,
    },
    FullCell {
        start: f64,
        length: f64,
        radius: f64,
        chamfer: f64,
        joint_left: f64,
        joint_right: f64,
        tube_left: f64,
        tube_right: f64,
    },
    Drift {
        start: f64,
        length: f64,
        radius_left: f64,
        radius_right: f64,
    },
}

/// An immutable cavity description: title, setting, half cell, full cells,
/// drift.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CavityGeometry {
    segments: Vec<Segment>,
}

impl CavityGeometry {
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the cell radii in parameter order.
    #[must_use]
    pub fn radii(&self) -> Vec<f64> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::HalfCell { radius, .. } | Segment::FullCell { radius, .. } => {
                    Some(*radius)
                }
                Segment::Title { .. } | Segment::Setting { .. } | Segment::Drift { .. } => None,
            })
            .collect()
    }

    /// Returns the axial position where the drift ends, in cm.
    #[must_use]
    pub fn axial_extent(&self) -> f64 {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::HalfCell { length, .. } => *length,
                Segment::FullCell { start, length, .. } | Segment::Drift { start, length, .. } => {
                    start + length
                }
                Segment::Title { .. } | Segment::Setting { .. } => 0.0,
            })
            .fold(0.0, f64::max)
    }
}
