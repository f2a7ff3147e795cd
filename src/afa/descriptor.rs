// Copyright 2025 Cowboy AI, LLC.

//! Declarative automaton definition
//!
//! An [`AfaDescriptor`] is pure data: a start state, a set of final states, a
//! default register, and one transition function per ordered `(from, to)`
//! pair. It is built once through `&mut self` registration and then shared
//! read-only (typically behind an `Arc`) by any number of evaluations.

use crate::identifiers::StateId;
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Transition predicate over a same-timestamp batch
///
/// Returns `Some(new_register)` when the transition accepts the batch given
/// the run's current register, `None` otherwise.
pub type TransitionFn<I, R> = Arc<dyn Fn(&[I], &R) -> Option<R> + Send + Sync>;

/// Augmented finite automaton: states, arcs with register-aware predicates, and final states
pub struct AfaDescriptor<I, R> {
    start_state: StateId,
    default_register: R,
    final_states: IndexSet<StateId>,
    arcs: IndexMap<StateId, IndexMap<StateId, TransitionFn<I, R>>>,
    overwritten_arcs: usize,
}

impl<I, R: Clone> AfaDescriptor<I, R> {
    /// Create a descriptor with no arcs and no final states
    pub fn new(start_state: StateId, default_register: R) -> Self {
        Self {
            start_state,
            default_register,
            final_states: IndexSet::new(),
            arcs: IndexMap::new(),
            overwritten_arcs: 0,
        }
    }

    /// Register the transition function for `(from, to)`
    ///
    /// A second registration for the same pair replaces the first. States are
    /// not validated; an arc out of an unreachable state simply never fires.
    pub fn add_arc<F>(&mut self, from: StateId, to: StateId, transition: F) -> &mut Self
    where
        F: Fn(&[I], &R) -> Option<R> + Send + Sync + 'static,
    {
        self.add_shared_arc(from, to, Arc::new(transition))
    }

    /// Register an already shared transition function for `(from, to)`
    pub fn add_shared_arc(
        &mut self,
        from: StateId,
        to: StateId,
        transition: TransitionFn<I, R>,
    ) -> &mut Self {
        let replaced = self.arcs.entry(from).or_default().insert(to, transition);
        if replaced.is_some() {
            self.overwritten_arcs += 1;
            warn!(%from, %to, "arc registered twice, keeping the latest transition");
        }
        self
    }

    /// Mark `state` as accepting
    pub fn add_final_state(&mut self, state: StateId) -> &mut Self {
        self.final_states.insert(state);
        self
    }

    /// Check whether `state` is accepting
    pub fn is_final_state(&self, state: StateId) -> bool {
        self.final_states.contains(&state)
    }

    /// States reachable by one arc from `state`, in registration order
    pub fn to_states_from(&self, state: StateId) -> Vec<StateId> {
        self.arcs
            .get(&state)
            .map(|targets| targets.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Evaluate the `(from, to)` arc against a batch
    ///
    /// An unregistered arc never accepts.
    pub fn try_apply_transition(
        &self,
        batch: &[I],
        from: StateId,
        to: StateId,
        old_register: &R,
    ) -> Option<R> {
        let transition = self.arcs.get(&from)?.get(&to)?;
        transition(batch, old_register)
    }

    /// State every new run starts in
    pub fn start_state(&self) -> StateId {
        self.start_state
    }

    /// Register every new run starts with
    pub fn default_register(&self) -> &R {
        &self.default_register
    }

    /// Number of registered arcs
    pub fn arc_count(&self) -> usize {
        self.arcs.values().map(IndexMap::len).sum()
    }

    /// How many registrations replaced an existing arc
    pub fn overwritten_arcs(&self) -> usize {
        self.overwritten_arcs
    }
}

impl<I, R: fmt::Debug> fmt::Debug for AfaDescriptor<I, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arcs: Vec<(StateId, StateId)> = self
            .arcs
            .iter()
            .flat_map(|(from, targets)| targets.keys().map(move |to| (*from, *to)))
            .collect();
        f.debug_struct("AfaDescriptor")
            .field("start_state", &self.start_state)
            .field("default_register", &self.default_register)
            .field("final_states", &self.final_states)
            .field("arcs", &arcs)
            .finish()
    }
}
