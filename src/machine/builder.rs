//! Builder for constructing state sets.

use crate::core::{State, DEFAULT_HISTORY_LIMIT};
use crate::machine::error::StateError;
use crate::machine::set::StateSet;

/// Builder for constructing state sets with a fluent API.
///
/// # Example
///
/// ```rust
/// use state_gate::{state_enum, StateSetBuilder};
///
/// state_enum! {
///     enum Link {
///         Down,
///         Negotiating,
///         Up,
///     }
/// }
///
/// let set = StateSetBuilder::new()
///     .initial(Link::Down)
///     .states([Link::Negotiating, Link::Up])
///     .history_limit(8)
///     .build()
///     .unwrap();
///
/// assert_eq!(set.current(), Link::Down);
/// assert_eq!(set.history().limit(), 8);
/// ```
#[derive(Debug)]
pub struct StateSetBuilder<S: State> {
    initial: Option<S>,
    others: Vec<S>,
    history_limit: usize,
}

impl<S: State> StateSetBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            others: Vec::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Register a state that is not initially current.
    pub fn state(mut self, state: S) -> Self {
        self.others.push(state);
        self
    }

    /// Register several states at once.
    pub fn states<I>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        self.others.extend(states);
        self
    }

    /// Number of transitions kept in the history. Zero disables it.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Build the state set.
    ///
    /// Fails if no initial state was given or a state was registered twice.
    pub fn build(self) -> Result<StateSet<S>, StateError> {
        let initial = self.initial.ok_or(StateError::MissingInitialState)?;
        StateSet::assemble(initial, self.others, self.history_limit)
    }
}

impl<S: State> Default for StateSetBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
