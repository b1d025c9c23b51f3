#![allow(dead_code)]

use std::{
    convert::Infallible,
    f64::consts::PI,
    fmt::Write,
    sync::atomic::{AtomicUsize, Ordering},
};

use gunfish_cavity::{
    CavityGeometry, CavityRequest, FieldProfile, Observables, SimulationOutput,
};
use gunfish_core::Model;

/// Samples per cell hump.
const HUMP: usize = 200;

/// On-axis `|sin|` humps, one per cell, followed by a flat drift.
pub fn field(peaks: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut amplitudes: Vec<f64> = peaks
        .iter()
        .flat_map(|&a| (0..HUMP).map(move |j| a * (PI * j as f64 / HUMP as f64).sin()))
        .collect();
    amplitudes.extend(std::iter::repeat_n(0.0, 40));
    let positions = (0..amplitudes.len()).map(|i| i as f64 * 0.01).collect();
    (positions, amplitudes)
}

pub fn output(frequency: f64, peaks: &[f64]) -> SimulationOutput {
    let (positions, amplitudes) = field(peaks);
    SimulationOutput {
        profile: FieldProfile::from_columns(&positions, &amplitudes).expect("valid profile"),
        observables: Observables {
            frequency,
            ..Observables::default()
        },
    }
}

/// Renders an `.SFO` summary with the given frequency and cell peaks (MV/m).
pub fn sfo_text(frequency: f64, peaks: &[f64]) -> String {
    let (positions, amplitudes) = field(peaks);
    let mut text = String::from("Superfish output summary\nfor normalization ASCALE = 1.0\n");
    text.push_str("      Z          Ez\n     (cm)       (V/m)\n");
    for (z, ez) in positions.iter().zip(&amplitudes) {
        writeln!(text, "  {z:.5}  {:.6E}", ez * 1e6).expect("write to string");
    }
    text.push_str("Total cavity stored energy = 0.1 Joules\n");
    text.push_str("All calculated values below refer to the mesh geometry only.\n");
    writeln!(text, " Frequency           =   {frequency:.5} MHz").expect("write to string");
    text.push_str(" Transit-time factor =   0.75\nWall segments:\n");
    text
}

/// A synthetic cavity whose response is linear in the radii.
///
/// Frequency and the second-cell peak are exactly on target when the radii
/// equal `center`.
pub struct LinearCavity {
    pub design_mhz: f64,
    pub center: [f64; 2],
    pub calls: AtomicUsize,
}

impl LinearCavity {
    pub fn new(design_mhz: f64, center: [f64; 2]) -> Self {
        Self {
            design_mhz,
            center,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Returns `(frequency, peaks)` for the given geometry.
    pub fn response(&self, geometry: &CavityGeometry) -> (f64, [f64; 2]) {
        let radii = geometry.radii();
        let d0 = radii[0] - self.center[0];
        let d1 = radii[1] - self.center[1];
        let frequency = self.design_mhz * (1.0 + 0.01 * d0 + 0.02 * d1);
        let second = 1.0 + 0.5 * (d1 - d0);
        (frequency, [40.0, 40.0 * second])
    }
}

impl Model for LinearCavity {
    type Input = CavityRequest;
    type Output = SimulationOutput;
    type Error = Infallible;

    fn call(&self, request: &CavityRequest) -> Result<SimulationOutput, Infallible> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (frequency, peaks) = self.response(&request.geometry);
        Ok(output(frequency, &peaks))
    }
}
