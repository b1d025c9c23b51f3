use serde::Serialize;

/// Scalar figures of merit reported by one simulation run.
///
/// Only the frequency is required; the rest are whatever the solver reported.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Observables {
    /// Resonant frequency in MHz.
    pub frequency: f64,
    pub transit_time_factor: Option<f64>,
    pub quality_factor: Option<f64>,
    /// Shunt impedance in MΩ/m.
    pub shunt_impedance: Option<f64>,
    /// Effective shunt impedance `Z·T²` in MΩ/m.
    pub effective_shunt_impedance: Option<f64>,
    /// Shape factor `r/Q` in Ω.
    pub shape_factor: Option<f64>,
    /// Peak-to-average field ratio `Emax/E0`.
    pub peak_ratio: Option<f64>,
}

/// Everything known about a simulated cavity after field analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservableSet {
    #[serde(flatten)]
    pub observables: Observables,

    /// Peak of each full cell relative to the half-cell peak.
    pub flatness: Vec<f64>,

    /// Cathode field relative to the maximum field, if the field has a
    /// positive maximum.
    pub head_ratio: Option<f64>,
}
