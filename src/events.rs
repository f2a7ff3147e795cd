// Copyright 2025 Cowboy AI, LLC.

//! Domain events and stored event records
//!
//! Events represent facts that have occurred in the domain. They are immutable
//! and form the basis of event sourcing: an aggregate's state is whatever
//! replaying its events produces.

use crate::identifiers::AggregateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base trait for all domain events
///
/// Each aggregate declares its events as one enum; `event_type` names the
/// variant for logging and storage.
///
/// # Examples
///
/// ```rust
/// use cep_core::DomainEvent;
///
/// #[derive(Debug, Clone)]
/// enum CounterEvent {
///     Incremented,
///     Reset,
/// }
///
/// impl DomainEvent for CounterEvent {
///     fn event_type(&self) -> &'static str {
///         match self {
///             CounterEvent::Incremented => "Incremented",
///             CounterEvent::Reset => "Reset",
///         }
///     }
/// }
///
/// assert_eq!(CounterEvent::Reset.event_type(), "Reset");
/// assert_eq!(CounterEvent::Reset.version(), "v1");
/// ```
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Get the event type name
    fn event_type(&self) -> &'static str;

    /// Get the schema version
    fn version(&self) -> &'static str {
        "v1"
    }
}

/// An event as held by a repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent<E> {
    /// Aggregate the event belongs to
    pub aggregate_id: AggregateId,
    /// Position in the aggregate's stream, starting at 1
    pub sequence: u64,
    /// The event itself
    pub event: E,
    /// When the event was stored
    pub recorded_at: DateTime<Utc>,
}

impl<E: DomainEvent> StoredEvent<E> {
    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }
}
