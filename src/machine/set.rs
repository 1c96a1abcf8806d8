//! Set of mutually exclusive states with waitable transitions.

use crate::core::signal::Signal;
use crate::core::{State, StateHistory, StateTransition, DEFAULT_HISTORY_LIMIT};
use crate::machine::error::StateError;
use chrono::Utc;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Edge {
    Enter,
    Exit,
}

#[derive(Debug)]
struct Inner<S: State> {
    states: HashMap<S, Signal>,
    history: StateHistory<S>,
}

impl<S: State> Inner<S> {
    fn register(&mut self, state: S, on: bool) -> Result<(), StateError> {
        match self.states.entry(state) {
            Entry::Occupied(entry) => Err(StateError::StateExists(entry.key().name().to_string())),
            Entry::Vacant(entry) => {
                entry.insert(Signal::new(on));
                Ok(())
            }
        }
    }

    fn signal(&self, state: &S) -> Result<&Signal, StateError> {
        self.states
            .get(state)
            .ok_or_else(|| StateError::StateNotExists(state.name().to_string()))
    }

    fn current(&self) -> Option<&S> {
        self.states
            .iter()
            .find(|(_, signal)| signal.is_on())
            .map(|(state, _)| state)
    }
}

/// A set of registered states of which exactly one is current.
///
/// Any number of tasks may call [`transit`](Self::transit) while others wait
/// for a state to be entered ([`wait_for`](Self::wait_for)) or left
/// ([`wait_for_exit`](Self::wait_for_exit)). Waits take a caller-owned
/// [`CancellationToken`] and give up with [`StateError::Cancelled`] once it
/// fires. No transition rules are enforced: any registered state can become
/// current at any time.
///
/// Share it between tasks with an `Arc`.
///
/// # Example
///
/// ```rust
/// use state_gate::{state_enum, StateSet};
/// use tokio_util::sync::CancellationToken;
///
/// state_enum! {
///     enum Phase {
///         Starting,
///         Serving,
///         Draining,
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let set = StateSet::new(Phase::Starting, [Phase::Serving, Phase::Draining]).unwrap();
///
/// set.transit(&Phase::Serving).unwrap();
/// assert_eq!(set.current(), Phase::Serving);
///
/// // Already current, returns at once.
/// set.wait_for(&CancellationToken::new(), &Phase::Serving).await.unwrap();
/// # }
/// ```
#[derive(Debug)]
pub struct StateSet<S: State> {
    inner: RwLock<Inner<S>>,
    teardown: CancellationToken,
}

impl<S: State> StateSet<S> {
    /// Create a set whose current state is `initial`, with `others` registered
    /// but not current.
    ///
    /// Fails with [`StateError::StateExists`] if any state appears twice,
    /// including a repeat of `initial`.
    pub fn new<I>(initial: S, others: I) -> Result<Self, StateError>
    where
        I: IntoIterator<Item = S>,
    {
        Self::assemble(initial, others, DEFAULT_HISTORY_LIMIT)
    }

    pub(crate) fn assemble<I>(
        initial: S,
        others: I,
        history_limit: usize,
    ) -> Result<Self, StateError>
    where
        I: IntoIterator<Item = S>,
    {
        let mut inner = Inner {
            states: HashMap::new(),
            history: StateHistory::with_limit(history_limit),
        };

        let initial_name = initial.name().to_string();
        inner.register(initial, true)?;
        for state in others {
            inner.register(state, false)?;
        }

        debug!(
            initial = %initial_name,
            states = inner.states.len(),
            "state set created"
        );

        Ok(Self {
            inner: RwLock::new(inner),
            teardown: CancellationToken::new(),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner<S>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner<S>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make `target` the current state.
    ///
    /// The target is switched on before every other state is switched off.
    /// Transiting to the state that is already current does nothing. Fails
    /// with [`StateError::StateNotExists`] for an unknown target, leaving the
    /// current state untouched.
    pub fn transit(&self, target: &S) -> Result<(), StateError> {
        let mut inner = self.write();
        if self.teardown.is_cancelled() {
            return Err(StateError::Released);
        }

        let previous = inner.current().cloned();
        inner.signal(target)?.set_on();
        for (state, signal) in &inner.states {
            if state != target {
                signal.set_off();
            }
        }

        match previous {
            Some(from) if &from != target => {
                debug!(from = from.name(), to = target.name(), "state transition");
                inner.history.record(StateTransition {
                    from,
                    to: target.clone(),
                    timestamp: Utc::now(),
                });
            }
            _ => {
                trace!(state = target.name(), "already current");
            }
        }

        Ok(())
    }

    /// The current state.
    ///
    /// # Panics
    ///
    /// Panics if no state is current. That only happens after
    /// [`release`](Self::release) or if the single-current-state invariant was
    /// broken.
    pub fn current(&self) -> S {
        match self.read().current() {
            Some(state) => state.clone(),
            None => panic!("state set has no current state"),
        }
    }

    /// Wait until `state` is current.
    ///
    /// Returns immediately if it already is. Returns
    /// [`StateError::Cancelled`] if `cancel` fires first, even when the state
    /// is current at the same time, and [`StateError::Released`] if the set is
    /// released while waiting.
    pub async fn wait_for(
        &self,
        cancel: &CancellationToken,
        state: &S,
    ) -> Result<(), StateError> {
        self.wait(cancel, state, Edge::Enter).await
    }

    /// Wait until `state` is no longer current.
    ///
    /// Counterpart of [`wait_for`](Self::wait_for) with the same cancellation
    /// and release behavior.
    pub async fn wait_for_exit(
        &self,
        cancel: &CancellationToken,
        state: &S,
    ) -> Result<(), StateError> {
        self.wait(cancel, state, Edge::Exit).await
    }

    /// [`wait_for`](Self::wait_for) bounded by a deadline instead of a token.
    ///
    /// Fails with [`StateError::TimedOut`] once `timeout` elapses. Must be
    /// called within a tokio runtime.
    pub async fn wait_for_within(&self, state: &S, timeout: Duration) -> Result<(), StateError> {
        self.wait_within(state, Edge::Enter, timeout).await
    }

    /// [`wait_for_exit`](Self::wait_for_exit) bounded by a deadline.
    pub async fn wait_for_exit_within(
        &self,
        state: &S,
        timeout: Duration,
    ) -> Result<(), StateError> {
        self.wait_within(state, Edge::Exit, timeout).await
    }

    async fn wait_within(
        &self,
        state: &S,
        edge: Edge,
        timeout: Duration,
    ) -> Result<(), StateError> {
        let never = CancellationToken::new();
        tokio::time::timeout(timeout, self.wait(&never, state, edge))
            .await
            .unwrap_or(Err(StateError::TimedOut(timeout)))
    }

    async fn wait(
        &self,
        cancel: &CancellationToken,
        state: &S,
        edge: Edge,
    ) -> Result<(), StateError> {
        // The token is cloned under the lock and awaited without it.
        let edge_token = {
            let inner = self.read();
            if self.teardown.is_cancelled() {
                return Err(StateError::Released);
            }
            let signal = inner.signal(state)?;
            match edge {
                Edge::Enter => signal.on_edge(),
                Edge::Exit => signal.off_edge(),
            }
        };

        trace!(state = state.name(), ?edge, "waiting for state");

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(StateError::Cancelled),
            _ = self.teardown.cancelled() => Err(StateError::Released),
            _ = edge_token.cancelled() => Ok(()),
        };

        trace!(state = state.name(), ?edge, ?outcome, "wait finished");
        outcome
    }

    /// Whether `state` is registered.
    pub fn contains(&self, state: &S) -> bool {
        self.read().states.contains_key(state)
    }

    /// All registered states, in no particular order.
    pub fn states(&self) -> Vec<S> {
        self.read().states.keys().cloned().collect()
    }

    /// Copy of the recorded transitions.
    pub fn history(&self) -> StateHistory<S> {
        self.read().history.clone()
    }

    pub fn is_released(&self) -> bool {
        self.teardown.is_cancelled()
    }

    /// Tear the set down.
    ///
    /// Every pending wait returns [`StateError::Released`]. Afterwards
    /// `transit` and the waits fail with the same error, `current` panics and
    /// no state is registered. Releasing twice is a no-op.
    pub fn release(&self) {
        let mut inner = self.write();
        if self.teardown.is_cancelled() {
            return;
        }

        // Teardown first so woken waiters can tell a release from an edge.
        self.teardown.cancel();
        let count = inner.states.len();
        for (_, signal) in inner.states.drain() {
            signal.release();
        }

        debug!(states = count, "state set released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum TestState {
        A,
        B,
        C,
        Z,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::A => "A",
                Self::B => "B",
                Self::C => "C",
                Self::Z => "Z",
            }
        }
    }

    fn abc() -> StateSet<TestState> {
        StateSet::new(TestState::A, [TestState::B, TestState::C]).unwrap()
    }

    fn on_count(set: &StateSet<TestState>) -> usize {
        set.read()
            .states
            .values()
            .filter(|signal| signal.is_on())
            .count()
    }

    #[test]
    fn new_makes_initial_current() {
        let set = abc();
        assert_eq!(set.current(), TestState::A);
        assert_eq!(on_count(&set), 1);
        assert!(set.contains(&TestState::C));
        assert!(!set.contains(&TestState::Z));
        assert_eq!(set.states().len(), 3);
    }

    #[test]
    fn new_with_only_initial() {
        let set = StateSet::new(TestState::B, []).unwrap();
        assert_eq!(set.current(), TestState::B);
    }

    #[test]
    fn duplicate_initial_is_rejected() {
        let result = StateSet::new(TestState::A, [TestState::A]);
        assert_eq!(result.unwrap_err(), StateError::StateExists("A".into()));
    }

    #[test]
    fn duplicate_other_is_rejected() {
        let result = StateSet::new(TestState::A, [TestState::B, TestState::C, TestState::B]);
        assert_eq!(result.unwrap_err(), StateError::StateExists("B".into()));
    }

    #[test]
    fn transit_moves_current() {
        let set = abc();
        set.transit(&TestState::B).unwrap();
        assert_eq!(set.current(), TestState::B);
        assert_eq!(on_count(&set), 1);

        set.transit(&TestState::C).unwrap();
        set.transit(&TestState::A).unwrap();
        assert_eq!(set.current(), TestState::A);
        assert_eq!(on_count(&set), 1);
    }

    #[test]
    fn transit_to_current_is_noop() {
        let set = abc();
        set.transit(&TestState::A).unwrap();
        assert_eq!(set.current(), TestState::A);
        assert!(set.history().is_empty());
    }

    #[test]
    fn transit_to_unknown_fails_and_keeps_state() {
        let set = abc();
        set.transit(&TestState::B).unwrap();

        let err = set.transit(&TestState::Z).unwrap_err();
        assert_eq!(err, StateError::StateNotExists("Z".into()));
        assert_eq!(set.current(), TestState::B);
    }

    #[test]
    fn transit_records_history() {
        let set = abc();
        set.transit(&TestState::B).unwrap();
        set.transit(&TestState::B).unwrap();
        set.transit(&TestState::C).unwrap();

        let history = set.history();
        assert_eq!(history.len(), 2);
        assert_eq!(
            history.get_path(),
            vec![&TestState::A, &TestState::B, &TestState::C]
        );
    }

    #[test]
    fn release_clears_states() {
        let set = abc();
        set.release();
        set.release();

        assert!(set.is_released());
        assert!(set.states().is_empty());
        assert_eq!(set.transit(&TestState::A), Err(StateError::Released));
    }

    #[test]
    #[should_panic(expected = "no current state")]
    fn current_after_release_panics() {
        let set = abc();
        set.release();
        set.current();
    }

    #[tokio::test]
    async fn wait_for_current_state_returns_at_once() {
        let set = abc();
        let cancel = CancellationToken::new();
        set.wait_for(&cancel, &TestState::A).await.unwrap();
        set.wait_for_exit(&cancel, &TestState::B).await.unwrap();
    }

    #[tokio::test]
    async fn wait_for_unknown_state_fails() {
        let set = abc();
        let cancel = CancellationToken::new();
        assert_eq!(
            set.wait_for(&cancel, &TestState::Z).await,
            Err(StateError::StateNotExists("Z".into()))
        );
        assert_eq!(
            set.wait_for_exit(&cancel, &TestState::Z).await,
            Err(StateError::StateNotExists("Z".into()))
        );
    }

    #[tokio::test]
    async fn cancelled_token_wins_over_current_state() {
        let set = abc();
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert_eq!(
            set.wait_for(&cancel, &TestState::A).await,
            Err(StateError::Cancelled)
        );
        assert_eq!(
            set.wait_for(&cancel, &TestState::B).await,
            Err(StateError::Cancelled)
        );
    }

    #[tokio::test]
    async fn wait_for_within_times_out() {
        let set = abc();
        let timeout = Duration::from_millis(20);
        assert_eq!(
            set.wait_for_within(&TestState::C, timeout).await,
            Err(StateError::TimedOut(timeout))
        );
        assert_eq!(
            set.wait_for_exit_within(&TestState::A, timeout).await,
            Err(StateError::TimedOut(timeout))
        );
    }

    #[tokio::test]
    async fn waiters_wake_on_transit() {
        let set = Arc::new(abc());

        let enter = tokio::spawn({
            let set = Arc::clone(&set);
            async move { set.wait_for(&CancellationToken::new(), &TestState::B).await }
        });
        let exit = tokio::spawn({
            let set = Arc::clone(&set);
            async move { set.wait_for_exit(&CancellationToken::new(), &TestState::A).await }
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!enter.is_finished());
        assert!(!exit.is_finished());

        set.transit(&TestState::B).unwrap();

        assert_eq!(enter.await.unwrap(), Ok(()));
        assert_eq!(exit.await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn release_wakes_waiters_as_released() {
        let set = Arc::new(abc());

        let waiter = tokio::spawn({
            let set = Arc::clone(&set);
            async move { set.wait_for(&CancellationToken::new(), &TestState::C).await }
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        set.release();

        assert_eq!(waiter.await.unwrap(), Err(StateError::Released));
        assert_eq!(
            set.wait_for(&CancellationToken::new(), &TestState::C).await,
            Err(StateError::Released)
        );
    }
}
