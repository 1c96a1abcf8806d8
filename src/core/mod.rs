//! Core types of the state set.
//!
//! This module contains the building blocks the [`StateSet`](crate::StateSet)
//! is assembled from:
//! - State keys via the `State` trait
//! - The two-token `Signal` each registered state owns
//! - Bounded transition history

mod history;
pub(crate) mod signal;
mod state;

pub use history::{StateHistory, StateTransition, DEFAULT_HISTORY_LIMIT};
pub use state::State;
