// Copyright 2025 Cowboy AI, LLC.

//! Window assignment for driving the operator over a whole stream
//!
//! Windows are aligned to tick zero. Only windows that receive at least one
//! event are produced.

use super::event::{PointEvent, Window};
use super::time::Ticks;
use crate::errors::{PatternError, PatternResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a stream is cut into evaluation windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WindowSpec {
    /// Back-to-back windows of `size` ticks
    Tumbling {
        /// Window length
        size: Ticks,
    },
    /// Windows of `size` ticks starting every `hop` ticks
    Hopping {
        /// Window length
        size: Ticks,
        /// Distance between window starts
        hop: Ticks,
    },
}

impl WindowSpec {
    fn size_and_hop(&self) -> PatternResult<(i64, i64)> {
        let (size, hop) = match *self {
            WindowSpec::Tumbling { size } => (size, size),
            WindowSpec::Hopping { size, hop } => (size, hop),
        };
        if size.0 <= 0 || hop.0 <= 0 {
            return Err(PatternError::InvalidWindow {
                reason: format!("size {size} and hop {hop} must be positive"),
            });
        }
        Ok((size.0, hop.0))
    }

    /// Windows containing the instant `at`, earliest first
    ///
    /// Fails with [`PatternError::InvalidWindow`] when a window bound would
    /// fall outside the tick range.
    pub fn windows_containing(&self, at: Ticks) -> PatternResult<Vec<Window>> {
        let (size, hop) = self.size_and_hop()?;
        let out_of_range = || PatternError::InvalidWindow {
            reason: format!("windows of size {size} around {at} exceed the tick range"),
        };

        let first = at
            .0
            .checked_sub(size)
            .ok_or_else(out_of_range)?
            .div_euclid(hop)
            + 1;
        let last = at.0.div_euclid(hop);
        (first..=last)
            .map(|k| {
                let start = k.checked_mul(hop).ok_or_else(out_of_range)?;
                let end = start.checked_add(size).ok_or_else(out_of_range)?;
                Ok(Window {
                    start: Ticks(start),
                    end: Ticks(end),
                })
            })
            .collect()
    }

    /// Distribute events into the windows they start in, ordered by window start
    pub fn assign<I: Clone>(
        &self,
        events: &[PointEvent<I>],
    ) -> PatternResult<Vec<(Window, Vec<PointEvent<I>>)>> {
        let mut windows: BTreeMap<Ticks, (Window, Vec<PointEvent<I>>)> = BTreeMap::new();
        for event in events {
            for window in self.windows_containing(event.start)? {
                windows
                    .entry(window.start)
                    .or_insert_with(|| (window, Vec::new()))
                    .1
                    .push(event.clone());
            }
        }
        Ok(windows.into_values().collect())
    }
}
