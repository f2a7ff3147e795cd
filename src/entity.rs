// Copyright 2025 Cowboy AI, LLC.

//! Event-sourced aggregate roots
//!
//! An aggregate's state is rebuilt by replaying its history through a single
//! exhaustive `apply` match. Behavior methods validate first and only then
//! call [`AggregateRoot::apply_change`], so a rejected command never records
//! an event.

use crate::events::DomainEvent;
use crate::identifiers::AggregateId;

/// Version and uncommitted events of one aggregate instance
///
/// Owned exclusively by the aggregate; only the provided methods of
/// [`AggregateRoot`] mutate it.
#[derive(Debug, Clone, PartialEq)]
pub struct Changes<E> {
    version: u64,
    uncommitted: Vec<E>,
}

impl<E> Default for Changes<E> {
    fn default() -> Self {
        Self {
            version: 0,
            uncommitted: Vec::new(),
        }
    }
}

impl<E> Changes<E> {
    /// Events applied so far, historical and uncommitted
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Events applied since the last save
    pub fn uncommitted(&self) -> &[E] {
        &self.uncommitted
    }

    pub(crate) fn advance(&mut self) {
        self.version += 1;
    }

    pub(crate) fn record(&mut self, event: E) {
        self.version += 1;
        self.uncommitted.push(event);
    }

    fn take(&mut self) -> Vec<E> {
        std::mem::take(&mut self.uncommitted)
    }
}

/// Trait for event-sourced aggregate roots
///
/// # Examples
///
/// ```rust
/// use cep_core::{AggregateId, AggregateRoot, Changes, DomainEvent};
///
/// #[derive(Debug, Clone, PartialEq)]
/// enum CounterEvent {
///     Incremented,
/// }
///
/// impl DomainEvent for CounterEvent {
///     fn event_type(&self) -> &'static str {
///         "Incremented"
///     }
/// }
///
/// struct Counter {
///     id: AggregateId,
///     value: u32,
///     changes: Changes<CounterEvent>,
/// }
///
/// impl AggregateRoot for Counter {
///     type Event = CounterEvent;
///
///     fn create(id: AggregateId) -> Self {
///         Self { id, value: 0, changes: Changes::default() }
///     }
///     fn id(&self) -> AggregateId {
///         self.id
///     }
///     fn apply(&mut self, event: &CounterEvent) {
///         match event {
///             CounterEvent::Incremented => self.value += 1,
///         }
///     }
///     fn changes(&self) -> &Changes<CounterEvent> {
///         &self.changes
///     }
///     fn changes_mut(&mut self) -> &mut Changes<CounterEvent> {
///         &mut self.changes
///     }
/// }
///
/// let mut counter = Counter::create(AggregateId::new());
/// counter.load_from_history(vec![CounterEvent::Incremented]);
/// counter.apply_change(CounterEvent::Incremented);
///
/// assert_eq!(counter.value, 2);
/// assert_eq!(counter.version(), 2);
/// assert_eq!(counter.committed_version(), 1);
/// assert_eq!(counter.uncommitted_changes(), &[CounterEvent::Incremented]);
/// ```
pub trait AggregateRoot: Sized {
    /// The event enum this aggregate applies
    type Event: DomainEvent + Clone;

    /// Create a fresh instance with no history
    fn create(id: AggregateId) -> Self;

    /// Get the aggregate's ID
    fn id(&self) -> AggregateId;

    /// Mutate in-memory state for one event; must be deterministic
    fn apply(&mut self, event: &Self::Event);

    /// Version and uncommitted events
    fn changes(&self) -> &Changes<Self::Event>;

    /// Mutable access for the provided methods
    fn changes_mut(&mut self) -> &mut Changes<Self::Event>;

    /// Replay already committed events; nothing is recorded as uncommitted
    fn load_from_history(&mut self, history: impl IntoIterator<Item = Self::Event>) {
        for event in history {
            self.apply(&event);
            self.changes_mut().advance();
        }
    }

    /// Apply a new event and record it as uncommitted
    fn apply_change(&mut self, event: Self::Event) {
        self.apply(&event);
        self.changes_mut().record(event);
    }

    /// Events applied since the last save, in order
    fn uncommitted_changes(&self) -> &[Self::Event] {
        self.changes().uncommitted()
    }

    /// Hand the uncommitted events to a repository, clearing them
    fn take_uncommitted_changes(&mut self) -> Vec<Self::Event> {
        self.changes_mut().take()
    }

    /// Drop uncommitted events after they were persisted elsewhere
    fn mark_changes_committed(&mut self) {
        self.changes_mut().take();
    }

    /// Number of events applied, historical and uncommitted
    fn version(&self) -> u64 {
        self.changes().version()
    }

    /// Version as of the last load or save; the expected version when saving
    fn committed_version(&self) -> u64 {
        self.version() - self.uncommitted_changes().len() as u64
    }
}

/// Build an aggregate by replaying its full history into a fresh instance
pub fn rehydrate<A: AggregateRoot>(
    id: AggregateId,
    history: impl IntoIterator<Item = A::Event>,
) -> A {
    let mut aggregate = A::create(id);
    aggregate.load_from_history(history);
    aggregate
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Minimal aggregate: a running total with a reset
    #[derive(Debug, Clone, PartialEq)]
    pub enum TallyEvent {
        Added(i64),
        Reset,
    }

    impl DomainEvent for TallyEvent {
        fn event_type(&self) -> &'static str {
            match self {
                TallyEvent::Added(_) => "Added",
                TallyEvent::Reset => "Reset",
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Tally {
        pub id: AggregateId,
        pub total: i64,
        pub resets: u32,
        pub changes: Changes<TallyEvent>,
    }

    impl AggregateRoot for Tally {
        type Event = TallyEvent;

        fn create(id: AggregateId) -> Self {
            Self {
                id,
                total: 0,
                resets: 0,
                changes: Changes::default(),
            }
        }

        fn id(&self) -> AggregateId {
            self.id
        }

        fn apply(&mut self, event: &TallyEvent) {
            match event {
                TallyEvent::Added(n) => self.total += n,
                TallyEvent::Reset => {
                    self.total = 0;
                    self.resets += 1;
                }
            }
        }

        fn changes(&self) -> &Changes<TallyEvent> {
            &self.changes
        }

        fn changes_mut(&mut self) -> &mut Changes<TallyEvent> {
            &mut self.changes
        }
    }
}
