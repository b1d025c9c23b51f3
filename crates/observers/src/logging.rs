use gunfish_core::Observer;
use gunfish_solvers::equation::newton::{Action, Event};

/// Reports Newton progress through the `log` facade.
///
/// Base evaluations are logged at `info`, probes and steps at `debug`. The
/// observer never acts on the solver.
#[derive(Debug, Clone)]
pub struct LogObserver {
    label: String,
}

impl LogObserver {
    /// Creates an observer whose messages are prefixed with `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Returns the message prefix.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<I, O> Observer<Event<'_, I, O>, Action> for LogObserver {
    fn observe(&mut self, event: &Event<'_, I, O>) -> Option<Action> {
        match event {
            Event::Evaluated { cycle, eval } => log::info!(
                "{}: cycle {cycle} x = {:?} y = {:?} max |y| = {:.3e}",
                self.label,
                eval.x,
                eval.residuals,
                eval.max_residual(),
            ),
            Event::Probed {
                cycle,
                dimension,
                eval,
            } => log::debug!(
                "{}: cycle {cycle} probe {dimension} x = {:?} y = {:?}",
                self.label,
                eval.x,
                eval.residuals,
            ),
            Event::Stepped { cycle, from, to } => {
                log::debug!("{}: cycle {cycle} step {from:?} -> {to:?}", self.label);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gunfish_core::Snapshot;
    use gunfish_solvers::equation::Evaluation;

    #[test]
    fn never_acts() {
        let mut observer = LogObserver::new("test");
        let eval = Evaluation {
            x: vec![1.0],
            residuals: vec![0.5],
            snapshot: Snapshot::new((), ()),
        };

        let events = [
            Event::Evaluated {
                cycle: 0,
                eval: &eval,
            },
            Event::Probed {
                cycle: 0,
                dimension: 0,
                eval: &eval,
            },
            Event::Stepped {
                cycle: 0,
                from: &[1.0],
                to: &[0.5],
            },
        ];

        for event in &events {
            assert_eq!(observer.observe(event), None);
        }
        assert_eq!(observer.label(), "test");
    }
}
