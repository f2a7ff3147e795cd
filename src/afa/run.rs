// Copyright 2025 Cowboy AI, LLC.

//! In-flight partial matches

use crate::identifiers::StateId;

/// One partial match: the automaton state it reached and its register
///
/// Runs are values. Firing a transition builds a new run; the old one is
/// simply not carried into the next generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run<R> {
    /// Current automaton state
    pub state: StateId,
    /// Register accumulated along the match
    pub register: R,
}

impl<R> Run<R> {
    /// Create a run in `state` holding `register`
    pub fn new(state: StateId, register: R) -> Self {
        Self { state, register }
    }
}
