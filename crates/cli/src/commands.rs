use std::{
    fs,
    io::{self, BufWriter},
    path::Path,
};

use anyhow::Context;
use gunfish_cavity::{CavityDesign, CavityGeometry, ObservableSet, TuningOptions, superfish};
use serde::Serialize;

/// Geometry report: the design's derived dimensions plus its segments.
#[derive(Debug, Serialize)]
pub struct GeometryReport {
    pub name: String,
    pub frequency: f64,
    pub cell_count: f64,
    pub wavelength: f64,
    pub matched_radius: f64,
    pub radii: Vec<f64>,
    pub geometry: CavityGeometry,
}

pub fn geometry_report(
    name: &str,
    frequency: f64,
    cells: f64,
    radii: Option<&[f64]>,
) -> anyhow::Result<GeometryReport> {
    let design = CavityDesign::from_mhz(name, frequency, cells)?;
    let radii = radii.map_or_else(|| design.initial_guess(), <[f64]>::to_vec);
    let geometry = design.build(&radii)?;

    Ok(GeometryReport {
        name: design.name().to_string(),
        frequency: design.frequency_mhz(),
        cell_count: design.cell_count(),
        wavelength: design.wavelength_cm(),
        matched_radius: design.matched_radius(),
        radii,
        geometry,
    })
}

pub fn geometry(
    name: &str,
    frequency: f64,
    cells: f64,
    radii: Option<&[f64]>,
) -> anyhow::Result<()> {
    let report = geometry_report(name, frequency, cells, radii)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn analysis(sfo: &Path, cells: f64, options: Option<&Path>) -> anyhow::Result<ObservableSet> {
    let options = match options {
        Some(path) => TuningOptions::load(path)?,
        None => TuningOptions::default(),
    };

    let text =
        fs::read_to_string(sfo).with_context(|| format!("cannot read {}", sfo.display()))?;
    let output =
        superfish::parse_sfo(&text).with_context(|| format!("cannot parse {}", sfo.display()))?;

    // The run's own frequency stands in for the design frequency; only the
    // cell count matters for the analysis.
    let design = CavityDesign::from_mhz("analysis", output.observables.frequency, cells)?;
    let set = options
        .analyzer()
        .analyze(&output, design.parameter_count())?;

    log::info!(
        "{}: {} MHz, flatness {:?}",
        sfo.display(),
        set.observables.frequency,
        set.flatness
    );
    Ok(set)
}

pub fn analyze(sfo: &Path, cells: f64, options: Option<&Path>) -> anyhow::Result<()> {
    let set = analysis(sfo, cells, options)?;
    println!("{}", serde_json::to_string_pretty(&set)?);
    Ok(())
}

pub fn export(listing: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let text = fs::read_to_string(listing)
        .with_context(|| format!("cannot read {}", listing.display()))?;
    let map = superfish::parse_sf7(&text)
        .with_context(|| format!("cannot parse {}", listing.display()))?
        .normalized_for_tracking()?;

    match output {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            map.write_to(BufWriter::new(file))?;
            log::info!("wrote {} rows to {}", map.rows().len(), path.display());
        }
        None => map.write_to(io::stdout().lock())?,
    }
    Ok(())
}

pub fn options(file: Option<&Path>) -> anyhow::Result<()> {
    let options = match file {
        Some(path) => TuningOptions::load(path)?,
        None => TuningOptions::default(),
    };
    print!("{}", options.to_toml_string()?);
    Ok(())
}
