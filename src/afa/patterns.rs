// Copyright 2025 Cowboy AI, LLC.

//! Ready-made automata
//!
//! [`updown_descriptor`] detects N consecutive downticks immediately followed
//! by N consecutive upticks in a stream of price changes:
//!
//! ```text
//!   ┌─down─┐        ┌─up, n>1─┐
//!   ▼      │        ▼         │
//!  (0) ──down──▶ (1) ──up, n==1──▶ ((2))
//! ```
//!
//! The sample transitions look only at the first event of each batch.

use super::descriptor::AfaDescriptor;
use crate::identifiers::StateId;
use serde::{Deserialize, Serialize};

/// A price movement observed at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockTick {
    /// Signed change against the previous price
    pub price_change: f64,
}

impl StockTick {
    /// Create a tick with the given price change
    pub fn new(price_change: f64) -> Self {
        Self { price_change }
    }

    fn is_downtick(&self) -> bool {
        self.price_change < 0.0
    }

    fn is_uptick(&self) -> bool {
        self.price_change > 0.0
    }
}

/// Register counting unmatched downticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CounterRegister {
    /// Downticks not yet balanced by an uptick
    pub counter: u32,
}

impl CounterRegister {
    /// Create a register holding `counter`
    pub fn new(counter: u32) -> Self {
        Self { counter }
    }
}

/// Start state of the up/down pattern
pub const UPDOWN_START: StateId = StateId(0);
/// State reached after the first downtick
pub const UPDOWN_COUNTING: StateId = StateId(1);
/// Accepting state
pub const UPDOWN_MATCHED: StateId = StateId(2);

/// Downtick: count it
pub fn count_downtick(batch: &[StockTick], register: &CounterRegister) -> Option<CounterRegister> {
    let tick = batch.first()?;
    tick.is_downtick()
        .then(|| CounterRegister::new(register.counter + 1))
}

/// Uptick with more than one downtick outstanding: consume one
pub fn consume_uptick(batch: &[StockTick], register: &CounterRegister) -> Option<CounterRegister> {
    let tick = batch.first()?;
    (tick.is_uptick() && register.counter > 1)
        .then(|| CounterRegister::new(register.counter - 1))
}

/// Uptick balancing the last outstanding downtick: the pattern completes
pub fn final_uptick(batch: &[StockTick], register: &CounterRegister) -> Option<CounterRegister> {
    let tick = batch.first()?;
    (tick.is_uptick() && register.counter == 1).then(|| CounterRegister::new(0))
}

/// The "N downticks then N upticks" automaton
pub fn updown_descriptor() -> AfaDescriptor<StockTick, CounterRegister> {
    let mut afa = AfaDescriptor::new(UPDOWN_START, CounterRegister::default());
    afa.add_arc(UPDOWN_START, UPDOWN_START, count_downtick)
        .add_arc(UPDOWN_START, UPDOWN_COUNTING, count_downtick)
        .add_arc(UPDOWN_COUNTING, UPDOWN_COUNTING, consume_uptick)
        .add_arc(UPDOWN_COUNTING, UPDOWN_MATCHED, final_uptick)
        .add_final_state(UPDOWN_MATCHED);
    afa
}
