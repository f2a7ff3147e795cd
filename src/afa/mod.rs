// Copyright 2025 Cowboy AI, LLC.

//! Augmented finite automaton (AFA) pattern matching over windows of point events
//!
//! - [`AfaDescriptor`]: the automaton, as data
//! - [`EventSet`]: the batch of payloads sharing one timestamp
//! - [`AfaOperator`]: evaluates a descriptor over a window, tracking every
//!   in-flight partial match as a [`Run`]
//! - [`WindowSpec`]: cuts a stream into tumbling or hopping windows

pub mod config;
pub mod descriptor;
pub mod event;
pub mod event_set;
pub mod operator;
pub mod patterns;
pub mod run;
pub mod time;
pub mod window;

pub use config::AfaConfig;
pub use descriptor::{AfaDescriptor, TransitionFn};
pub use event::{IntervalEvent, PointEvent, Window};
pub use event_set::EventSet;
pub use operator::{AfaOperator, EvaluationReport, GenerationStats};
pub use run::Run;
pub use time::{Ticks, TICKS_PER_SECOND};
pub use window::WindowSpec;
