//! State Machine Runtime
//!
//! Typed flat state machine used by the scrubber's visibility logic.
//! Supports:
//! - Transition tables keyed by (state, event)
//! - Transition history for diagnostics
//!
//! Events with no entry for the current state are ignored, so guards are
//! expressed by leaving an edge out of the table.

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Maximum number of history entries kept before the oldest are dropped
const HISTORY_LIMIT: usize = 64;

/// A transition in the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<S, E> {
    pub from_state: S,
    pub event: E,
    pub to_state: S,
}

impl<S, E> Transition<S, E> {
    /// Create a transition
    pub fn new(from: S, event: E, to: S) -> Self {
        Self {
            from_state: from,
            event,
            to_state: to,
        }
    }
}

/// Builder for creating state machines
pub struct StateMachineBuilder<S, E> {
    initial_state: S,
    transitions: SmallVec<[Transition<S, E>; 8]>,
}

impl<S, E> StateMachineBuilder<S, E>
where
    S: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Hash + Debug,
{
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            transitions: SmallVec::new(),
        }
    }

    /// Add a transition
    pub fn transition(mut self, transition: Transition<S, E>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add a simple transition (from, event, to)
    pub fn on(self, from: S, event: E, to: S) -> Self {
        self.transition(Transition::new(from, event, to))
    }

    /// Build the state machine
    ///
    /// A later transition for the same (state, event) pair replaces an
    /// earlier one.
    pub fn build(self) -> StateMachine<S, E> {
        let mut table = FxHashMap::default();
        for t in self.transitions {
            table.insert((t.from_state, t.event), t.to_state);
        }
        StateMachine {
            current_state: self.initial_state,
            table,
            history: Vec::new(),
        }
    }
}

/// A state machine instance
#[derive(Debug, Clone)]
pub struct StateMachine<S, E> {
    current_state: S,
    table: FxHashMap<(S, E), S>,
    /// History of state transitions (for debugging)
    history: Vec<Transition<S, E>>,
}

impl<S, E> StateMachine<S, E>
where
    S: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Hash + Debug,
{
    /// Create a builder for a state machine
    pub fn builder(initial_state: S) -> StateMachineBuilder<S, E> {
        StateMachineBuilder::new(initial_state)
    }

    /// Get the current state
    pub fn current_state(&self) -> S {
        self.current_state
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: S) -> bool {
        self.current_state == state
    }

    /// Get transition history, oldest first
    pub fn history(&self) -> &[Transition<S, E>] {
        &self.history
    }

    /// Clear transition history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Check if an event can trigger a transition from current state
    pub fn can_send(&self, event: E) -> bool {
        self.table.contains_key(&(self.current_state, event))
    }

    /// Send an event to the state machine
    ///
    /// Returns the transition taken, or `None` if the event is not handled in
    /// the current state.
    pub fn send(&mut self, event: E) -> Option<Transition<S, E>> {
        let from = self.current_state;
        let to = *self.table.get(&(from, event))?;

        self.current_state = to;

        let transition = Transition::new(from, event, to);
        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push(transition);

        tracing::trace!(?from, ?event, ?to, "fsm transition");
        Some(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Light {
        Off,
        On,
        Broken,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Switch {
        Flip,
        Smash,
    }

    fn lamp() -> StateMachine<Light, Switch> {
        StateMachine::builder(Light::Off)
            .on(Light::Off, Switch::Flip, Light::On)
            .on(Light::On, Switch::Flip, Light::Off)
            .on(Light::On, Switch::Smash, Light::Broken)
            .build()
    }

    #[test]
    fn test_simple_transitions() {
        let mut fsm = lamp();
        assert_eq!(fsm.current_state(), Light::Off);

        assert!(fsm.send(Switch::Flip).is_some());
        assert!(fsm.is_in(Light::On));

        fsm.send(Switch::Flip);
        assert!(fsm.is_in(Light::Off));
    }

    #[test]
    fn test_invalid_event_no_transition() {
        let mut fsm = lamp();

        // Smash is only handled while on
        assert!(!fsm.can_send(Switch::Smash));
        assert_eq!(fsm.send(Switch::Smash), None);
        assert_eq!(fsm.current_state(), Light::Off);
        assert!(fsm.history().is_empty());
    }

    #[test]
    fn test_history() {
        let mut fsm = lamp();
        fsm.send(Switch::Flip);
        fsm.send(Switch::Smash);

        assert_eq!(
            fsm.history(),
            &[
                Transition::new(Light::Off, Switch::Flip, Light::On),
                Transition::new(Light::On, Switch::Smash, Light::Broken),
            ]
        );

        fsm.clear_history();
        assert!(fsm.history().is_empty());
        assert!(fsm.is_in(Light::Broken));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut fsm = lamp();
        for _ in 0..(HISTORY_LIMIT * 2 + 1) {
            fsm.send(Switch::Flip);
        }
        assert_eq!(fsm.history().len(), HISTORY_LIMIT);
        assert!(fsm.is_in(Light::On));
    }
}
