use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use thiserror::Error;

use crate::Model;

/// A shared flag that asks in-flight and future model calls to stop.
///
/// Clones share the same flag, so a token handed to a long-running runner can
/// be cancelled from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Errors returned by a [`Guarded`] model.
#[derive(Debug, Error)]
pub enum GuardError<E> {
    #[error("evaluation cancelled")]
    Cancelled,

    #[error("evaluation deadline exceeded")]
    DeadlineExceeded,

    #[error("model call failed")]
    Model(#[source] E),
}

/// A model wrapper that refuses to start calls after cancellation or after a
/// deadline.
///
/// The guard checks before every call and again after the wrapped call returns,
/// so a run that finishes past the deadline is reported as interrupted rather
/// than silently accepted. Solvers treat the error like any other model failure:
/// the seek aborts and no solver state is updated with the interrupted result.
#[derive(Debug, Clone)]
pub struct Guarded<M> {
    model: M,
    token: CancelToken,
    deadline: Option<Instant>,
}

impl<M> Guarded<M> {
    /// Wraps `model` with a cancellation token and no deadline.
    pub fn new(model: M, token: CancelToken) -> Self {
        Self {
            model,
            token,
            deadline: None,
        }
    }

    /// Sets an absolute deadline for all calls.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets a deadline `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns the token checked by this guard.
    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Returns the wrapped model.
    pub fn into_inner(self) -> M {
        self.model
    }

    fn check<E>(&self) -> Result<(), GuardError<E>> {
        if self.token.is_cancelled() {
            return Err(GuardError::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(GuardError::DeadlineExceeded);
        }
        Ok(())
    }
}

impl<M: Model> Model for Guarded<M> {
    type Input = M::Input;
    type Output = M::Output;
    type Error = GuardError<M::Error>;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.check()?;
        let output = self.model.call(input).map_err(GuardError::Model)?;
        self.check()?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    struct Double;

    impl Model for Double {
        type Input = f64;
        type Output = f64;
        type Error = Infallible;

        fn call(&self, input: &f64) -> Result<f64, Infallible> {
            Ok(2.0 * input)
        }
    }

    /// Cancels its own token while running, like a user hitting Ctrl-C mid-run.
    struct CancelsDuringCall(CancelToken);

    impl Model for CancelsDuringCall {
        type Input = ();
        type Output = ();
        type Error = Infallible;

        fn call(&self, _input: &()) -> Result<(), Infallible> {
            self.0.cancel();
            Ok(())
        }
    }

    #[test]
    fn passes_through_when_not_cancelled() {
        let guarded = Guarded::new(Double, CancelToken::new());
        assert_eq!(guarded.call(&1.5).expect("call succeeds"), 3.0);
    }

    #[test]
    fn cancelled_token_blocks_calls() {
        let token = CancelToken::new();
        let guarded = Guarded::new(Double, token.clone());

        token.cancel();

        assert!(matches!(guarded.call(&1.0), Err(GuardError::Cancelled)));
    }

    #[test]
    fn expired_deadline_blocks_calls() {
        let guarded = Guarded::new(Double, CancelToken::new()).with_deadline(Instant::now());
        assert!(matches!(
            guarded.call(&1.0),
            Err(GuardError::DeadlineExceeded)
        ));
    }

    #[test]
    fn cancellation_during_call_discards_result() {
        let token = CancelToken::new();
        let guarded = Guarded::new(CancelsDuringCall(token.clone()), token);

        assert!(matches!(guarded.call(&()), Err(GuardError::Cancelled)));
    }

    #[test]
    fn clones_share_the_flag() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
