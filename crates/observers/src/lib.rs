//! Reusable observers for gunfish solvers.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work with the solvers in `gunfish-solvers`.
//!
//! # Modules
//!
//! - [`traits`]: Capability traits for cross-solver observers
//!   ([`HasResidual`], [`CanStopEarly`])
//!
//! # Observers
//!
//! - [`LogObserver`]: reports solver progress through the `log` facade
//! - [`HistoryObserver`]: records the base point and residual of every cycle
//!
//! [`Observer`]: gunfish_core::Observer
//! [`HasResidual`]: traits::HasResidual
//! [`CanStopEarly`]: traits::CanStopEarly

pub mod traits;

mod history;
mod logging;

pub use history::{HistoryObserver, Record};
pub use logging::LogObserver;
