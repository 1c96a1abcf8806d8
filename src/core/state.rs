//! Core State trait for state set keys.
//!
//! Every state registered in a [`StateSet`](crate::StateSet) is a value of a
//! type implementing this trait. States are compared by equality and used as
//! map keys; their names show up in logs and error messages.

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for the states held by a state set.
///
/// # Required Traits
///
/// - `Clone`: states are copied into history records and returned by `current()`
/// - `Eq` + `Hash`: states key the set's signal map
/// - `Debug`: states are printed in diagnostics
/// - `Send` + `Sync`: states cross task and thread boundaries
///
/// # Example
///
/// ```rust
/// use state_gate::core::State;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Connection {
///     Idle,
///     Connecting,
///     Connected,
/// }
///
/// impl State for Connection {
///     fn name(&self) -> &str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Connecting => "Connecting",
///             Self::Connected => "Connected",
///         }
///     }
/// }
///
/// assert_eq!(Connection::Connecting.name(), "Connecting");
/// ```
pub trait State: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum TestState {
        Idle,
        Running,
        Stopped,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Idle => "Idle",
                Self::Running => "Running",
                Self::Stopped => "Stopped",
            }
        }
    }

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::Idle.name(), "Idle");
        assert_eq!(TestState::Running.name(), "Running");
        assert_eq!(TestState::Stopped.name(), "Stopped");
    }

    #[test]
    fn states_are_usable_as_keys() {
        let mut seen = HashSet::new();
        assert!(seen.insert(TestState::Idle));
        assert!(seen.insert(TestState::Running));
        assert!(!seen.insert(TestState::Idle));
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn string_states_work() {
        #[derive(Clone, PartialEq, Eq, Hash, Debug)]
        struct Named(String);

        impl State for Named {
            fn name(&self) -> &str {
                &self.0
            }
        }

        let state = Named("draining".to_string());
        assert_eq!(state.name(), "draining");
        assert_eq!(state.clone(), state);
    }
}
