//! Errors returned by state set operations.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when building, transiting or waiting on a state set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// A state was registered twice
    #[error("State {0} already exists")]
    StateExists(String),

    /// The referenced state was never registered
    #[error("State {0} does not exist")]
    StateNotExists(String),

    /// The caller's cancellation token fired before the wait completed
    #[error("Wait cancelled")]
    Cancelled,

    /// The wait deadline elapsed
    #[error("Wait timed out after {0:?}")]
    TimedOut(Duration),

    /// The state set was released
    #[error("State set has been released")]
    Released,

    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,
}
