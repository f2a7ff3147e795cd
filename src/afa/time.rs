// Copyright 2025 Cowboy AI, LLC.

//! Tick-based time model
//!
//! Event times are counted in 100-nanosecond ticks. A point event occupies
//! exactly one tick: `end == start + 1`.

use crate::errors::PatternError;
use chrono::{DateTime, TimeZone, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of ticks in one second
pub const TICKS_PER_SECOND: i64 = 10_000_000;

const NANOS_PER_TICK: i64 = 100;

/// A point on the event timeline, in 100ns ticks since the Unix epoch
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(transparent)]
pub struct Ticks(pub i64);

impl Ticks {
    /// Build a tick count from whole seconds; `None` past the tick range
    pub fn from_seconds(seconds: i64) -> Option<Self> {
        seconds.checked_mul(TICKS_PER_SECOND).map(Ticks)
    }

    /// The instant one tick after this one; `None` at the end of the timeline
    pub fn next(self) -> Option<Self> {
        self.checked_add(Ticks(1))
    }

    /// Add a duration, `None` on overflow
    pub fn checked_add(self, rhs: Ticks) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Ticks)
    }

    /// Subtract a duration, `None` on overflow
    pub fn checked_sub(self, rhs: Ticks) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Ticks)
    }

    /// Convert to a UTC timestamp; `None` if out of chrono's range
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        let seconds = self.0.div_euclid(TICKS_PER_SECOND);
        let nanos = self.0.rem_euclid(TICKS_PER_SECOND) * NANOS_PER_TICK;
        Utc.timestamp_opt(seconds, nanos as u32).single()
    }
}

impl TryFrom<DateTime<Utc>> for Ticks {
    type Error = PatternError;

    fn try_from(at: DateTime<Utc>) -> Result<Self, Self::Error> {
        let sub_ticks = i64::from(at.timestamp_subsec_nanos()) / NANOS_PER_TICK;
        at.timestamp()
            .checked_mul(TICKS_PER_SECOND)
            .and_then(|ticks| ticks.checked_add(sub_ticks))
            .map(Ticks)
            .ok_or_else(|| PatternError::TimeOutOfRange(at.to_rfc3339()))
    }
}

impl fmt::Display for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
