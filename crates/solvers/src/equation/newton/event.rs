use crate::equation::Evaluation;

/// Events emitted by the Newton solver.
#[derive(Debug)]
pub enum Event<'a, I, O> {
    /// The base point of a cycle was evaluated.
    Evaluated {
        cycle: usize,
        eval: &'a Evaluation<I, O>,
    },

    /// A forward-difference probe along one dimension was evaluated.
    Probed {
        cycle: usize,
        dimension: usize,
        eval: &'a Evaluation<I, O>,
    },

    /// The solver is moving from one quantized point to the next.
    Stepped {
        cycle: usize,
        from: &'a [f64],
        to: &'a [f64],
    },
}

impl<I, O> Event<'_, I, O> {
    /// Returns the cycle the event belongs to.
    #[must_use]
    pub fn cycle(&self) -> usize {
        match self {
            Self::Evaluated { cycle, .. }
            | Self::Probed { cycle, .. }
            | Self::Stepped { cycle, .. } => *cycle,
        }
    }

    /// Returns the evaluation carried by the event, if any.
    #[must_use]
    pub fn eval(&self) -> Option<&Evaluation<I, O>> {
        match self {
            Self::Evaluated { eval, .. } | Self::Probed { eval, .. } => Some(eval),
            Self::Stepped { .. } => None,
        }
    }
}
