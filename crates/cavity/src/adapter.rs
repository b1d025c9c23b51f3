//! The boundary between the tuner and the external field solver.
//!
//! The tuner sees the solver as a [`Model`] from [`CavityRequest`] to
//! [`SimulationOutput`]. [`SuperfishAdapter`] implements that contract on top of
//! a [`Runner`], the collaborator that writes the input deck and runs the
//! solver. Every run gets its own directory under the adapter root, named by
//! the request's [`RunId`], so runs at distinct points never share files.

use std::{
    error::Error as StdError,
    fmt, fs, io,
    path::{Path, PathBuf},
};

use gunfish_core::{CancelToken, Model};
use thiserror::Error;

use crate::{
    field::FieldProfile,
    geometry::CavityGeometry,
    observables::Observables,
    superfish::{self, ParseError},
};

/// File written by the solver's line-field post-processor.
pub const FIELD_LISTING: &str = "OUTSF7.TXT";

/// Working-directory identity of one simulation run.
///
/// Built from the design name and the quantized parameters, so two requests
/// share a directory exactly when they describe the same cavity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunId(String);

impl RunId {
    /// Creates the identity for `name` evaluated at `x`.
    #[must_use]
    pub fn new(name: &str, x: &[f64]) -> Self {
        let name: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        let point: Vec<String> = x.iter().map(|v| format!("{v}")).collect();
        Self(format!("{name}_{}", point.join("_")))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A request to simulate one cavity.
#[derive(Debug, Clone, PartialEq)]
pub struct CavityRequest {
    pub geometry: CavityGeometry,
    pub run: RunId,
}

/// What a simulation run reports.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutput {
    pub profile: FieldProfile,
    pub observables: Observables,
}

/// A failed simulation run. Always fatal for the current seek.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("no .{extension} artifact in {}", dir.display())]
    MissingArtifact {
        dir: PathBuf,
        extension: &'static str,
    },

    #[error("malformed artifact {}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("solver run {run} terminated abnormally")]
    Terminated {
        run: RunId,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("i/o error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("run {0} interrupted")]
    Interrupted(RunId),
}

impl SimulationError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Writes a solver input deck and runs the solver.
pub trait Runner {
    type Error: StdError + Send + Sync + 'static;

    /// Renders `geometry` into `dir` and runs the solver there.
    ///
    /// Blocks until the solver exits. On success the solver's output files are
    /// in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the deck cannot be written or the solver fails.
    fn run(&self, geometry: &CavityGeometry, dir: &Path) -> Result<(), Self::Error>;
}

/// Runs Superfish through a [`Runner`] and reads the `.SFO` summary it leaves.
#[derive(Debug, Clone)]
pub struct SuperfishAdapter<R> {
    runner: R,
    root: PathBuf,
    token: Option<CancelToken>,
}

impl<R: Runner> SuperfishAdapter<R> {
    /// Creates an adapter that places run directories under `root`.
    pub fn new(runner: R, root: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            root: root.into(),
            token: None,
        }
    }

    /// Refuses to start runs, and discards finished ones, once `token` is
    /// cancelled.
    #[must_use]
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.token = Some(token);
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the directory used for `run`.
    #[must_use]
    pub fn run_dir(&self, run: &RunId) -> PathBuf {
        self.root.join(run.as_str())
    }

    /// Reads the field listing a previous run left in its directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing is missing or malformed.
    pub fn field_listing(&self, run: &RunId) -> Result<FieldProfile, SimulationError> {
        let path = self.run_dir(run).join(FIELD_LISTING);
        if !path.is_file() {
            return Err(SimulationError::MissingArtifact {
                dir: self.run_dir(run),
                extension: "TXT",
            });
        }
        let text = fs::read_to_string(&path).map_err(SimulationError::io(&path))?;
        superfish::parse_sf7(&text).map_err(|source| SimulationError::Malformed { path, source })
    }

    fn check(&self, run: &RunId) -> Result<(), SimulationError> {
        if self.token.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(SimulationError::Interrupted(run.clone()));
        }
        Ok(())
    }
}

impl<R: Runner> Model for SuperfishAdapter<R> {
    type Input = CavityRequest;
    type Output = SimulationOutput;
    type Error = SimulationError;

    fn call(&self, request: &CavityRequest) -> Result<SimulationOutput, SimulationError> {
        self.check(&request.run)?;

        let dir = self.run_dir(&request.run);
        fs::create_dir_all(&dir).map_err(SimulationError::io(&dir))?;
        clear_artifacts(&dir)?;

        log::debug!("running {} in {}", request.run, dir.display());
        self.runner
            .run(&request.geometry, &dir)
            .map_err(|source| SimulationError::Terminated {
                run: request.run.clone(),
                source: Box::new(source),
            })?;

        self.check(&request.run)?;

        let path = find_artifact(&dir, "SFO")?;
        let text = fs::read_to_string(&path).map_err(SimulationError::io(&path))?;
        superfish::parse_sfo(&text).map_err(|source| SimulationError::Malformed { path, source })
    }
}

/// Returns the first file in `dir` with the given extension, ignoring case.
fn find_artifact(dir: &Path, extension: &'static str) -> Result<PathBuf, SimulationError> {
    artifacts(dir, extension)?
        .into_iter()
        .next()
        .ok_or_else(|| SimulationError::MissingArtifact {
            dir: dir.to_path_buf(),
            extension,
        })
}

/// Removes output left in `dir` by an earlier run at the same point.
fn clear_artifacts(dir: &Path) -> Result<(), SimulationError> {
    let mut stale = artifacts(dir, "SFO")?;
    let listing = dir.join(FIELD_LISTING);
    if listing.is_file() {
        stale.push(listing);
    }
    for path in stale {
        fs::remove_file(&path).map_err(SimulationError::io(&path))?;
    }
    Ok(())
}

/// Lists the files in `dir` with the given extension, ignoring case, sorted.
fn artifacts(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, SimulationError> {
    let mut matches = Vec::new();
    for entry in fs::read_dir(dir).map_err(SimulationError::io(dir))? {
        let path = entry.map_err(SimulationError::io(dir))?.path();
        let matches_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches_extension && path.is_file() {
            matches.push(path);
        }
    }
    matches.sort();
    Ok(matches)
}
