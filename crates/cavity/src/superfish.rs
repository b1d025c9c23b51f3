//! Readers for Superfish output files.
//!
//! Both readers scan line by line. Headers, unit rows, and separators are
//! expected inside the sections they read, so a line that does not have the
//! expected numeric shape is skipped rather than treated as an error.

use thiserror::Error;

use crate::{
    adapter::SimulationOutput,
    field::{FieldError, FieldProfile},
    observables::Observables,
};

const FIELD_TABLE_START: &str = "for normalization ASCALE";
const FIELD_TABLE_END: &str = "Total cavity stored";
const SCALARS_START: &str = "All calculated values below refer to the mesh geometry only.";
const SCALARS_END: &str = "Wall segments:";
const SF7_TABLE_START: &str = "Number of increments";

/// Superfish reports the axial field in V/m.
const VOLTS_PER_MEGAVOLT: f64 = 1e6;

/// Errors from reading a Superfish output file.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("no on-axis field table found")]
    MissingFieldTable,

    #[error("no resonant frequency found")]
    MissingFrequency,

    #[error("invalid field table: {0}")]
    Field(#[from] FieldError),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    FieldTable,
    Scalars,
}

/// Parses an `.SFO` summary file into a field profile and observables.
///
/// # Errors
///
/// Returns an error if the field table or the frequency is missing, or if the
/// field table is not a valid profile.
pub fn parse_sfo(text: &str) -> Result<SimulationOutput, ParseError> {
    let mut section = Section::Preamble;
    let mut positions = Vec::new();
    let mut amplitudes = Vec::new();
    let mut frequency = None;
    let mut observables = Observables::default();

    for line in text.lines() {
        match section {
            Section::FieldTable => {
                if let Some([z, ez]) = numbers(line, [0, 1]) {
                    positions.push(z);
                    amplitudes.push(ez / VOLTS_PER_MEGAVOLT);
                }
            }
            Section::Scalars => read_scalar(line, &mut frequency, &mut observables),
            Section::Preamble => {}
        }

        if line.starts_with(FIELD_TABLE_START) {
            section = Section::FieldTable;
        } else if line.starts_with(FIELD_TABLE_END) {
            section = Section::Preamble;
        } else if line.starts_with(SCALARS_START) {
            section = Section::Scalars;
        } else if line.starts_with(SCALARS_END) {
            break;
        }
    }

    if positions.is_empty() {
        return Err(ParseError::MissingFieldTable);
    }
    observables.frequency = frequency.ok_or(ParseError::MissingFrequency)?;

    Ok(SimulationOutput {
        profile: FieldProfile::from_columns(&positions, &amplitudes)?,
        observables,
    })
}

/// Parses an `OUTSF7.TXT` field listing: z in cm and Ez in MV/m.
///
/// # Errors
///
/// Returns an error if no table rows are found or they are not a valid profile.
pub fn parse_sf7(text: &str) -> Result<FieldProfile, ParseError> {
    let mut in_table = false;
    let mut positions = Vec::new();
    let mut amplitudes = Vec::new();

    for line in text.lines() {
        if line.starts_with(SF7_TABLE_START) {
            in_table = true;
        }
        if in_table {
            if let Some([z, ez]) = numbers(line, [0, 2]) {
                positions.push(z);
                amplitudes.push(ez);
            }
        }
    }

    if positions.is_empty() {
        return Err(ParseError::MissingFieldTable);
    }
    Ok(FieldProfile::from_columns(&positions, &amplitudes)?)
}

/// Reads one `key = value` line of the scalar section.
fn read_scalar(line: &str, frequency: &mut Option<f64>, observables: &mut Observables) {
    let Some(key) = line.split_whitespace().next() else {
        return;
    };

    match key {
        "Frequency" => {
            if let Some([f]) = numbers(line, [2]) {
                *frequency = Some(f);
            }
        }
        "Transit-time" => {
            if let Some([t]) = numbers(line, [3]) {
                observables.transit_time_factor = Some(t);
            }
        }
        "Q" => {
            if let Some([q, z]) = numbers(line, [2, 6]) {
                observables.quality_factor = Some(q);
                observables.shunt_impedance = Some(z);
            }
        }
        "Rs*Q" => {
            if let Some([ztt]) = numbers(line, [6]) {
                observables.effective_shunt_impedance = Some(ztt);
            }
        }
        "r/Q" => {
            if let Some([r_over_q]) = numbers(line, [2]) {
                observables.shape_factor = Some(r_over_q);
            }
        }
        "Peak-to-average" => {
            if let Some([ratio]) = numbers(line, [4]) {
                observables.peak_ratio = Some(ratio);
            }
        }
        _ => {}
    }
}

/// Returns the whitespace-separated tokens at `columns` parsed as numbers, or
/// `None` if any is missing or not numeric.
fn numbers<const N: usize>(line: &str, columns: [usize; N]) -> Option<[f64; N]> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let mut values = [0.0; N];
    for (value, column) in values.iter_mut().zip(columns) {
        *value = tokens.get(column)?.parse().ok()?;
    }
    Some(values)
}
