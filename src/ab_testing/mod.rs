// Copyright 2025 Cowboy AI, LLC.

//! A/B testing domain
//!
//! A small but complete event-sourced domain built on the crate's aggregate,
//! repository, and saga traits: [`AbTest`] tracks variants, assignments, and
//! conversions; [`RolloutSaga`] promotes the winner once a test concludes.

mod aggregate;
mod commands;
mod rollout;

pub use aggregate::{AbTest, AbTestEvent, AbTestStatus};
pub use commands::{AbTestCommand, AbTestCommandHandler};
pub use rollout::{RolloutCommand, RolloutEvent, RolloutSaga, RolloutSagaHandler, RolloutStatus};
