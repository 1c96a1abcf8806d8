//! State Gate: a concurrent state set with waitable transitions
//!
//! A [`StateSet`] holds a fixed collection of states of which exactly one is
//! current. Any task can move the current state with
//! [`transit`](StateSet::transit); any number of other tasks can wait until
//! a state becomes current or stops being current. Waits race a caller-owned
//! [`CancellationToken`](tokio_util::sync::CancellationToken), so they can
//! always be abandoned.
//!
//! # Core Concepts
//!
//! - **State**: hashable state keys via the `State` trait or `state_enum!`
//! - **Signal**: per-state switch made of two one-shot tokens, one announcing
//!   "became on", the other "became off", re-armed on every flip
//! - **StateSet**: the signals of all states, with a single one on
//! - **History**: bounded record of the transitions that happened
//!
//! There are no transition rules: any registered state may follow any other.
//!
//! # Example
//!
//! ```rust
//! use state_gate::{state_enum, StateSet};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! state_enum! {
//!     enum Worker {
//!         Idle,
//!         Busy,
//!         Stopped,
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let set = Arc::new(StateSet::new(Worker::Idle, [Worker::Busy, Worker::Stopped]).unwrap());
//!
//! let waiter = tokio::spawn({
//!     let set = Arc::clone(&set);
//!     async move { set.wait_for(&CancellationToken::new(), &Worker::Stopped).await }
//! });
//!
//! set.transit(&Worker::Busy).unwrap();
//! set.transit(&Worker::Stopped).unwrap();
//!
//! assert_eq!(waiter.await.unwrap(), Ok(()));
//! assert_eq!(set.history().len(), 2);
//! # }
//! ```

pub mod core;
pub mod machine;
mod macros;

// Re-export commonly used types
pub use crate::core::{State, StateHistory, StateTransition};
pub use crate::machine::{StateError, StateSet, StateSetBuilder};
