//! Tuning options read from TOML.
//!
//! Options are resolved leniently: a missing, mistyped, or out-of-range entry
//! falls back to its default and logs a warning, so a partial file is always
//! usable. Only failing to read the file is an error.
//!
//! ```toml
//! tolerance = 1e-3
//! max_cycles = 100
//! relaxation = 0.5
//! step = 1e-3
//! decimals = 4
//! lookahead = 20
//! delta = 0.0
//! parallel = true
//! ```

use std::{fs, io, path::Path};

use gunfish_solvers::equation::newton;
use serde::Serialize;
use thiserror::Error;
use toml::{Table, Value};

use crate::analyzer::FieldAnalyzer;

const KEYS: [&str; 8] = [
    "tolerance",
    "max_cycles",
    "relaxation",
    "step",
    "decimals",
    "lookahead",
    "delta",
    "parallel",
];

/// Errors from loading tuning options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("cannot read options from {path}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Resolved tuning options. Always valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TuningOptions {
    pub tolerance: f64,
    pub max_cycles: usize,
    pub relaxation: f64,
    pub step: f64,
    pub decimals: u32,
    pub lookahead: usize,
    pub delta: f64,
    pub parallel: bool,
}

impl Default for TuningOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-3,
            max_cycles: 100,
            relaxation: 0.5,
            step: 1e-3,
            decimals: 4,
            lookahead: 20,
            delta: 0.0,
            parallel: true,
        }
    }
}

impl TuningOptions {
    /// Reads options from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, OptionsError> {
        let text = fs::read_to_string(path).map_err(|source| OptionsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_toml_str(&text))
    }

    /// Resolves options from TOML text, falling back to defaults entry by entry.
    #[must_use]
    pub fn from_toml_str(text: &str) -> Self {
        match text.parse::<Table>() {
            Ok(table) => Self::from_table(&table),
            Err(err) => {
                log::warn!("invalid tuning options, using defaults: {err}");
                Self::default()
            }
        }
    }

    /// Resolves options from a parsed TOML table.
    #[must_use]
    pub fn from_table(table: &Table) -> Self {
        let defaults = Self::default();

        for key in table.keys().filter(|key| !KEYS.contains(&key.as_str())) {
            log::warn!("ignoring unknown tuning option `{key}`");
        }

        let resolved = Self {
            tolerance: float(table, "tolerance", defaults.tolerance, |v| v > 0.0),
            max_cycles: integer(table, "max_cycles", defaults.max_cycles, |_| true),
            relaxation: float(table, "relaxation", defaults.relaxation, |v| {
                v > 0.0 && v <= 1.0
            }),
            step: float(table, "step", defaults.step, |v| v > 0.0),
            decimals: integer(table, "decimals", defaults.decimals, |v| {
                v <= newton::MAX_DECIMALS
            }),
            lookahead: integer(table, "lookahead", defaults.lookahead, |v| v > 0),
            delta: float(table, "delta", defaults.delta, |v| v >= 0.0),
            parallel: boolean(table, "parallel", defaults.parallel),
        };

        resolved.with_consistent_step()
    }

    /// Returns the Newton solver configuration.
    #[must_use]
    pub fn solver_config(&self) -> newton::Config {
        newton::Config::new(
            self.max_cycles,
            self.tolerance,
            self.relaxation,
            self.step,
            self.decimals,
        )
        .unwrap_or_else(|err| {
            log::warn!("invalid solver options ({err}), using defaults");
            newton::Config::default()
        })
        .with_parallel(self.parallel)
    }

    /// Returns the field analyzer configuration.
    #[must_use]
    pub fn analyzer(&self) -> FieldAnalyzer {
        FieldAnalyzer::new(self.lookahead, self.delta).unwrap_or_else(|err| {
            log::warn!("invalid analyzer options ({err}), using defaults");
            FieldAnalyzer::default()
        })
    }

    /// Renders the options as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Keeps the probe step at or above the quantization step.
    fn with_consistent_step(mut self) -> Self {
        if newton::Config::new(
            self.max_cycles,
            self.tolerance,
            self.relaxation,
            self.step,
            self.decimals,
        )
        .is_err()
        {
            let defaults = Self::default();
            log::warn!(
                "step {} is finer than {} decimals allow, using step {} with {} decimals",
                self.step,
                self.decimals,
                defaults.step,
                defaults.decimals
            );
            self.step = defaults.step;
            self.decimals = defaults.decimals;
        }
        self
    }
}

fn float(table: &Table, key: &str, default: f64, valid: impl Fn(f64) -> bool) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let value = match table.get(key) {
        None => return missing(key, default),
        Some(Value::Float(v)) => Some(*v),
        Some(Value::Integer(v)) => Some(*v as f64),
        Some(_) => None,
    };
    match value {
        Some(v) if v.is_finite() && valid(v) => v,
        _ => invalid(key, default),
    }
}

fn integer<T>(table: &Table, key: &str, default: T, valid: impl Fn(T) -> bool) -> T
where
    T: TryFrom<i64> + Copy + std::fmt::Display,
{
    let value = match table.get(key) {
        None => return missing(key, default),
        Some(Value::Integer(v)) => T::try_from(*v).ok(),
        Some(_) => None,
    };
    match value {
        Some(v) if valid(v) => v,
        _ => invalid(key, default),
    }
}

fn boolean(table: &Table, key: &str, default: bool) -> bool {
    match table.get(key) {
        None => missing(key, default),
        Some(Value::Boolean(v)) => *v,
        Some(_) => invalid(key, default),
    }
}

fn missing<T: std::fmt::Display>(key: &str, default: T) -> T {
    log::warn!("tuning option `{key}` not set, using default {default}");
    default
}

fn invalid<T: std::fmt::Display>(key: &str, default: T) -> T {
    log::warn!("tuning option `{key}` is invalid, using default {default}");
    default
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(TuningOptions::from_toml_str(""), TuningOptions::default());
    }

    #[test]
    fn reads_every_option() {
        let options = TuningOptions::from_toml_str(
            "tolerance = 1e-4\nmax_cycles = 20\nrelaxation = 1\nstep = 0.01\n\
             decimals = 3\nlookahead = 10\ndelta = 0.5\nparallel = false\n",
        );

        assert_eq!(
            options,
            TuningOptions {
                tolerance: 1e-4,
                max_cycles: 20,
                relaxation: 1.0,
                step: 0.01,
                decimals: 3,
                lookahead: 10,
                delta: 0.5,
                parallel: false,
            }
        );
    }

    #[test]
    fn invalid_entries_fall_back_individually() {
        let options = TuningOptions::from_toml_str(
            "tolerance = -1.0\nmax_cycles = \"many\"\nrelaxation = 0.25\nlookahead = 0\n",
        );

        let defaults = TuningOptions::default();
        assert_eq!(options.tolerance, defaults.tolerance);
        assert_eq!(options.max_cycles, defaults.max_cycles);
        assert_eq!(options.relaxation, 0.25);
        assert_eq!(options.lookahead, defaults.lookahead);
    }

    #[test]
    fn syntax_error_gives_defaults() {
        assert_eq!(
            TuningOptions::from_toml_str("tolerance = = 3"),
            TuningOptions::default()
        );
    }

    #[test]
    fn step_finer_than_quantum_is_reset() {
        let options = TuningOptions::from_toml_str("step = 1e-6\ndecimals = 4\n");

        assert_eq!(options.step, 1e-3);
        assert_eq!(options.decimals, 4);
    }

    #[test]
    fn converts_to_solver_and_analyzer_configs() {
        let options = TuningOptions {
            parallel: false,
            lookahead: 7,
            ..TuningOptions::default()
        };

        let config = options.solver_config();
        assert_eq!(config.max_cycles(), 100);
        assert!(!config.parallel());
        assert_eq!(options.analyzer().detector().lookahead(), 7);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "max_cycles = 7").expect("write options");

        let options = TuningOptions::load(file.path()).expect("readable");

        assert_eq!(options.max_cycles, 7);
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(TuningOptions::load(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn renders_as_toml() {
        let text = TuningOptions::default()
            .to_toml_string()
            .expect("serializable");
        assert_eq!(
            TuningOptions::from_toml_str(&text),
            TuningOptions::default()
        );
    }
}
