// Copyright 2025 Cowboy AI, LLC.

//! Same-timestamp batches of input events

use super::event::{PointEvent, Window};
use super::time::Ticks;
use std::collections::BTreeMap;

/// All payloads of one window that share a start time
///
/// Transition functions see the whole batch at once so a pattern can reason
/// over simultaneous events.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSet<T> {
    start_time: Ticks,
    end_time: Ticks,
    events: Vec<T>,
}

impl<T> EventSet<T> {
    /// Start an empty set at `start_time`, bounded by the window end
    pub fn new(start_time: Ticks, window_end: Ticks) -> Self {
        Self {
            start_time,
            end_time: window_end,
            events: Vec::new(),
        }
    }

    /// Append an event's payload and tighten the end time
    pub fn add(&mut self, event: PointEvent<T>) {
        self.end_time = self.end_time.min(event.end);
        self.events.push(event.payload);
    }

    /// Common start time of the batch
    pub fn start_time(&self) -> Ticks {
        self.start_time
    }

    /// Earliest end time among the batch, never past the window end
    pub fn end_time(&self) -> Ticks {
        self.end_time
    }

    /// Payloads in arrival order
    pub fn events(&self) -> &[T] {
        &self.events
    }

    /// Number of payloads in the batch
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the batch holds no payloads
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Group events by start time, ascending; arrival order is kept within a set
pub fn group_by_timestamp<T>(window: &Window, events: Vec<PointEvent<T>>) -> Vec<EventSet<T>> {
    let mut sets: BTreeMap<Ticks, EventSet<T>> = BTreeMap::new();
    for event in events {
        sets.entry(event.start)
            .or_insert_with(|| EventSet::new(event.start, window.end))
            .add(event);
    }
    sets.into_values().collect()
}
