// Copyright 2025 Cowboy AI, LLC.

//! Windowed AFA evaluation
//!
//! The operator walks the event sets of one window in timestamp order and
//! keeps a generation of runs between steps:
//!
//! ```text
//! for each event set (ascending start time):
//!     current = []
//!     for run in previous:          try every outbound arc, keep accepted runs
//!     seed Run(start, default):     try every outbound arc, keep accepted runs
//!     previous = current
//! ```
//!
//! A run landing on a final state emits a match immediately and is still
//! carried into the next generation. One run is seeded per event set, so
//! overlapping match instances can start at every timestamp.

use super::config::AfaConfig;
use super::descriptor::AfaDescriptor;
use super::event::{IntervalEvent, PointEvent, Window};
use super::event_set::{group_by_timestamp, EventSet};
use super::run::Run;
use super::time::Ticks;
use super::window::WindowSpec;
use crate::errors::{PatternError, PatternResult};
use std::sync::Arc;
use tracing::{debug, trace};

/// Per-event-set bookkeeping of one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationStats {
    /// Start time of the event set
    pub timestamp: Ticks,
    /// Payloads in the batch
    pub batch_len: usize,
    /// Runs carried in from the previous generation
    pub carried_runs: usize,
    /// Runs handed to the next generation
    pub surviving_runs: usize,
    /// Matches emitted at this event set
    pub matches: usize,
}

/// Matches of one window plus the run lifecycle that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport<R> {
    /// The window that was evaluated
    pub window: Window,
    /// Completed matches in emission order
    pub matches: Vec<IntervalEvent<R>>,
    /// One entry per event set, in timestamp order
    pub generations: Vec<GenerationStats>,
}

/// Pattern matcher evaluating an [`AfaDescriptor`] over windows of point events
///
/// The descriptor is shared read-only; each call to [`evaluate`](Self::evaluate)
/// owns its runs, so one operator can serve concurrent windows.
pub struct AfaOperator<I, R> {
    descriptor: Arc<AfaDescriptor<I, R>>,
    config: AfaConfig,
}

impl<I, R: Clone> AfaOperator<I, R> {
    /// Create an operator with the default configuration
    pub fn new(descriptor: Arc<AfaDescriptor<I, R>>) -> Self {
        Self::with_config(descriptor, AfaConfig::default())
    }

    /// Create an operator with explicit limits
    pub fn with_config(descriptor: Arc<AfaDescriptor<I, R>>, config: AfaConfig) -> Self {
        Self { descriptor, config }
    }

    /// The automaton this operator runs
    pub fn descriptor(&self) -> &Arc<AfaDescriptor<I, R>> {
        &self.descriptor
    }

    /// Evaluate one window and return its completed matches
    pub fn evaluate(
        &self,
        window: &Window,
        events: impl IntoIterator<Item = PointEvent<I>>,
    ) -> PatternResult<Vec<IntervalEvent<R>>> {
        Ok(self.evaluate_with_report(window, events)?.matches)
    }

    /// Evaluate one window, also reporting per-generation run counts
    ///
    /// Fails without producing any output if an event is not a point event
    /// or does not start inside the window.
    pub fn evaluate_with_report(
        &self,
        window: &Window,
        events: impl IntoIterator<Item = PointEvent<I>>,
    ) -> PatternResult<EvaluationReport<R>> {
        let events: Vec<PointEvent<I>> = events.into_iter().collect();
        for event in &events {
            event.ensure_point()?;
            if !window.contains(event.start) {
                return Err(PatternError::EventOutsideWindow {
                    start: event.start,
                    window: *window,
                });
            }
        }

        let event_sets = group_by_timestamp(window, events);
        let mut matches = Vec::new();
        let mut generations = Vec::with_capacity(event_sets.len());
        let mut previous_runs: Vec<Run<R>> = Vec::new();

        for set in &event_sets {
            let matched_before = matches.len();
            let mut current_runs = Vec::new();

            for run in &previous_runs {
                self.advance(window, set, run, &mut current_runs, &mut matches);
            }

            let seed = Run::new(
                self.descriptor.start_state(),
                self.descriptor.default_register().clone(),
            );
            self.advance(window, set, &seed, &mut current_runs, &mut matches);

            if let Some(limit) = self.config.max_active_runs {
                if current_runs.len() > limit {
                    return Err(PatternError::RunLimitExceeded {
                        limit,
                        attempted: current_runs.len(),
                    });
                }
            }

            generations.push(GenerationStats {
                timestamp: set.start_time(),
                batch_len: set.len(),
                carried_runs: previous_runs.len(),
                surviving_runs: current_runs.len(),
                matches: matches.len() - matched_before,
            });
            previous_runs = current_runs;
        }

        debug!(
            %window,
            event_sets = event_sets.len(),
            matches = matches.len(),
            "window evaluated"
        );

        Ok(EvaluationReport {
            window: *window,
            matches,
            generations,
        })
    }

    /// Cut a stream into windows and evaluate each one independently
    pub fn evaluate_stream(
        &self,
        spec: &WindowSpec,
        events: &[PointEvent<I>],
    ) -> PatternResult<Vec<IntervalEvent<R>>>
    where
        I: Clone,
    {
        let mut matches = Vec::new();
        for (window, window_events) in spec.assign(events)? {
            matches.extend(self.evaluate(&window, window_events)?);
        }
        Ok(matches)
    }

    fn advance(
        &self,
        window: &Window,
        set: &EventSet<I>,
        run: &Run<R>,
        next: &mut Vec<Run<R>>,
        matches: &mut Vec<IntervalEvent<R>>,
    ) {
        for to in self.descriptor.to_states_from(run.state) {
            let Some(register) = self.descriptor.try_apply_transition(
                set.events(),
                run.state,
                to,
                &run.register,
            ) else {
                continue;
            };

            trace!(from = %run.state, %to, at = %set.start_time(), "transition fired");
            if self.descriptor.is_final_state(to) {
                matches.push(IntervalEvent {
                    start: set.start_time(),
                    end: window.end,
                    payload: register.clone(),
                });
            }
            next.push(Run::new(to, register));
        }
    }
}
