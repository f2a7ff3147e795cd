// Copyright 2025 Cowboy AI, LLC.

//! Timestamped input and output events of the pattern engine

use super::time::Ticks;
use crate::errors::{PatternError, PatternResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An input event occupying a single instant on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointEvent<T> {
    /// When the event happened
    pub start: Ticks,
    /// Exclusive end; one tick after `start` for a well-formed point event
    pub end: Ticks,
    /// Domain payload
    pub payload: T,
}

impl<T> PointEvent<T> {
    /// Create a point event at `at`
    ///
    /// The last tick of the timeline has no successor, so an event there
    /// gets an empty span and is rejected on evaluation.
    pub fn at(at: Ticks, payload: T) -> Self {
        Self {
            start: at,
            end: at.next().unwrap_or(at),
            payload,
        }
    }

    /// Create an event with an explicit span; validity is checked on evaluation
    pub fn spanning(start: Ticks, end: Ticks, payload: T) -> Self {
        Self {
            start,
            end,
            payload,
        }
    }

    /// Check whether this event spans exactly one tick
    pub fn is_point(&self) -> bool {
        self.start.next() == Some(self.end)
    }

    /// Reject events that are not point events
    pub fn ensure_point(&self) -> PatternResult<()> {
        if self.is_point() {
            Ok(())
        } else {
            Err(PatternError::NonPointEvent {
                start: self.start,
                end: self.end,
            })
        }
    }
}

/// A completed pattern match
///
/// `start` is the time of the event set on which the match completed,
/// `end` is the end of the window it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalEvent<R> {
    /// Start of the match interval
    pub start: Ticks,
    /// End of the match interval
    pub end: Ticks,
    /// Register value of the run that reached a final state
    pub payload: R,
}

/// A half-open evaluation window `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Window {
    /// Inclusive start
    pub start: Ticks,
    /// Exclusive end
    pub end: Ticks,
}

impl Window {
    /// Create a window, rejecting empty or inverted bounds
    pub fn new(start: Ticks, end: Ticks) -> PatternResult<Self> {
        if end <= start {
            return Err(PatternError::InvalidWindow {
                reason: format!("end {end} must be after start {start}"),
            });
        }
        Ok(Self { start, end })
    }

    /// Check whether an instant falls inside the window
    pub fn contains(&self, at: Ticks) -> bool {
        self.start <= at && at < self.end
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
