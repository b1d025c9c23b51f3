/// Actions an observer can take during a Newton seek.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the solver and return the most recent base evaluation.
    StopEarly,
}
