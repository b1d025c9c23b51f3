use gunfish_core::Observer;
use gunfish_solvers::equation::newton::{Action, Event};

/// One base evaluation seen by a [`HistoryObserver`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub cycle: usize,
    pub x: Vec<f64>,
    pub residuals: Vec<f64>,
}

impl Record {
    /// Returns the largest residual magnitude of this record.
    #[must_use]
    pub fn max_residual(&self) -> f64 {
        self.residuals
            .iter()
            .fold(0.0_f64, |max, residual| max.max(residual.abs()))
    }
}

/// Records the base point and residuals of every Newton cycle.
///
/// Probe evaluations are counted but not stored. Pass it to a solver through a
/// closure to keep access afterwards:
///
/// ```rust,ignore
/// let mut history = HistoryObserver::default();
/// newton::solve(&model, &problem, &x0, &config, |e: &Event<'_, _, _>| history.observe(e))?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct HistoryObserver {
    records: Vec<Record>,
    probes: usize,
}

impl HistoryObserver {
    /// Returns the recorded base evaluations in cycle order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns the number of Jacobian probes observed.
    #[must_use]
    pub fn probes(&self) -> usize {
        self.probes
    }

    /// Returns the total number of model evaluations observed.
    #[must_use]
    pub fn evaluations(&self) -> usize {
        self.records.len() + self.probes
    }

    /// Consumes the observer and returns its records.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl<I, O> Observer<Event<'_, I, O>, Action> for HistoryObserver {
    fn observe(&mut self, event: &Event<'_, I, O>) -> Option<Action> {
        match event {
            Event::Evaluated { cycle, eval } => self.records.push(Record {
                cycle: *cycle,
                x: eval.x.clone(),
                residuals: eval.residuals.clone(),
            }),
            Event::Probed { .. } => self.probes += 1,
            Event::Stepped { .. } => {}
        }
        None
    }
}
