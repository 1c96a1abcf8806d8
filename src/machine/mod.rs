//! The state set and its construction.
//!
//! A [`StateSet`] owns one signal per registered state and keeps exactly one
//! of them on. Tasks move the current state with `transit` and wait for
//! states to be entered or left with `wait_for` / `wait_for_exit`.

mod builder;
mod error;
mod set;

pub use builder::StateSetBuilder;
pub use error::StateError;
pub use set::StateSet;
