// Copyright 2025 Cowboy AI, LLC.

//! # CEP Core
//!
//! Windowed pattern matching over event streams, plus the event-sourcing
//! substrate that the surrounding domain is built on.
//!
//! This crate provides:
//! - **AFA**: augmented finite automata evaluated over windows of point events,
//!   emitting one interval event per completed match
//! - **Aggregates**: consistency boundaries whose state is rebuilt by replaying events
//! - **Domain Events**: immutable facts, one enum per aggregate
//! - **Commands**: requests to change state, validated before any event is applied
//! - **Sagas**: aggregates that issue commands in reaction to their own events
//! - **Repositories**: load by full replay, save with optimistic concurrency
//!
//! ## Design Principles
//!
//! 1. **Descriptors are data**: an automaton is states, arcs, and transition
//!    functions, shared read-only across evaluations
//! 2. **Runs are ephemeral**: every window starts from nothing; no state crosses windows
//! 3. **Replay is pure**: applying the same history always yields the same state
//! 4. **Replay is silent**: rebuilding a saga never issues a command
//! 5. **Validate, then apply**: a rejected command leaves no trace

#![warn(missing_docs)]

pub mod ab_testing;
pub mod afa;
mod commands;
mod entity;
mod errors;
mod events;
mod identifiers;
mod repository;
mod saga;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use afa::{
    AfaConfig, AfaDescriptor, AfaOperator, EvaluationReport, EventSet, GenerationStats,
    IntervalEvent, PointEvent, Run, Ticks, TransitionFn, Window, WindowSpec, TICKS_PER_SECOND,
};
pub use commands::DomainCommand;
pub use entity::{rehydrate, AggregateRoot, Changes};
pub use errors::{DomainError, DomainResult, PatternError, PatternResult};
pub use events::{DomainEvent, StoredEvent};
pub use identifiers::{AggregateId, CorrelationId, StateId};
pub use repository::{EventSourcedRepository, Repository};
pub use saga::{ApplyMode, CommandIssuer, Outbox, Saga};
