// Copyright 2025 Cowboy AI, LLC.

//! Repositories for loading and saving event-sourced aggregates
//!
//! Loading always builds a fresh aggregate and replays its full stream.
//! Saving appends the aggregate's uncommitted events after an optimistic
//! concurrency check against the version the caller loaded.

use crate::entity::{rehydrate, AggregateRoot};
use crate::errors::{DomainError, DomainResult};
use crate::events::StoredEvent;
use crate::identifiers::AggregateId;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Repository trait for loading and saving aggregates
pub trait Repository<A: AggregateRoot>: Send + Sync {
    /// Rebuild an aggregate from its full history
    fn get_by_id(&self, id: AggregateId) -> DomainResult<A>;

    /// Persist the aggregate's uncommitted events
    ///
    /// `expected_version` is the stream length the caller based its changes
    /// on; `None` skips the check.
    fn save(&self, aggregate: &mut A, expected_version: Option<u64>) -> DomainResult<()>;
}

type Streams<E> = HashMap<AggregateId, Vec<StoredEvent<E>>>;

/// In-process event-sourced repository enforcing optimistic concurrency
pub struct EventSourcedRepository<A: AggregateRoot> {
    streams: Arc<RwLock<Streams<A::Event>>>,
}

impl<A: AggregateRoot> Clone for EventSourcedRepository<A> {
    fn clone(&self) -> Self {
        Self {
            streams: Arc::clone(&self.streams),
        }
    }
}

impl<A: AggregateRoot> Default for EventSourcedRepository<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: AggregateRoot> EventSourcedRepository<A> {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            streams: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Stored events of one aggregate, in sequence order
    pub fn history(&self, id: AggregateId) -> DomainResult<Vec<StoredEvent<A::Event>>> {
        let streams = self.streams.read().map_err(poisoned)?;
        Ok(streams.get(&id).cloned().unwrap_or_default())
    }

    /// Current stream length of one aggregate
    pub fn stream_version(&self, id: AggregateId) -> DomainResult<u64> {
        let streams = self.streams.read().map_err(poisoned)?;
        Ok(streams.get(&id).map_or(0, |s| s.len() as u64))
    }
}

impl<A: AggregateRoot> Repository<A> for EventSourcedRepository<A> {
    fn get_by_id(&self, id: AggregateId) -> DomainResult<A> {
        let streams = self.streams.read().map_err(poisoned)?;
        match streams.get(&id) {
            Some(stream) if !stream.is_empty() => {
                Ok(rehydrate(id, stream.iter().map(|stored| stored.event.clone())))
            }
            _ => Err(DomainError::AggregateNotFound(id.to_string())),
        }
    }

    fn save(&self, aggregate: &mut A, expected_version: Option<u64>) -> DomainResult<()> {
        let id = aggregate.id();
        let mut streams = self.streams.write().map_err(poisoned)?;
        let actual = streams.get(&id).map_or(0, |stream| stream.len() as u64);

        if let Some(expected) = expected_version {
            if expected != actual {
                return Err(DomainError::ConcurrencyConflict { expected, actual });
            }
        }

        let events = aggregate.take_uncommitted_changes();
        if events.is_empty() {
            return Ok(());
        }
        let recorded_at = Utc::now();
        let appended = events.len();
        let stream = streams.entry(id).or_default();
        stream.extend(events.into_iter().zip(actual + 1..).map(|(event, sequence)| {
            StoredEvent {
                aggregate_id: id,
                sequence,
                event,
                recorded_at,
            }
        }));

        debug!(
            aggregate_id = %id,
            appended,
            version = stream.len(),
            "aggregate saved"
        );
        Ok(())
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> DomainError {
    DomainError::InternalError(format!("repository lock poisoned: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::test_support::{Tally, TallyEvent};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_save_then_load_replays_full_history() {
        let repo: EventSourcedRepository<Tally> = EventSourcedRepository::new();
        let id = AggregateId::new();

        let mut tally = Tally::create(id);
        tally.apply_change(TallyEvent::Added(2));
        tally.apply_change(TallyEvent::Added(5));
        repo.save(&mut tally, Some(0)).unwrap();
        assert!(tally.uncommitted_changes().is_empty());

        let loaded = repo.get_by_id(id).unwrap();
        assert_eq!(loaded.total, 7);
        assert_eq!(loaded.version(), 2);

        let history = repo.history(id).unwrap();
        let sequences: Vec<u64> = history.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![1, 2]);
        assert_eq!(history[0].event_type(), "Added");
    }

    #[test]
    fn test_rejected_or_empty_saves_leave_no_stream() {
        let repo: EventSourcedRepository<Tally> = EventSourcedRepository::new();
        let id = AggregateId::new();

        let mut tally = Tally::create(id);
        tally.apply_change(TallyEvent::Added(1));
        let err = repo.save(&mut tally, Some(3)).unwrap_err();
        assert_eq!(
            err,
            DomainError::ConcurrencyConflict {
                expected: 3,
                actual: 0
            }
        );
        assert!(!repo.streams.read().unwrap().contains_key(&id));
        assert_eq!(tally.uncommitted_changes().len(), 1);

        let mut untouched = Tally::create(AggregateId::new());
        repo.save(&mut untouched, None).unwrap();
        assert!(repo.streams.read().unwrap().is_empty());
        assert!(repo.get_by_id(id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_missing_aggregate_is_not_found() {
        let repo: EventSourcedRepository<Tally> = EventSourcedRepository::new();
        let err = repo.get_by_id(AggregateId::new()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_stale_expected_version_conflicts() {
        let repo: EventSourcedRepository<Tally> = EventSourcedRepository::new();
        let id = AggregateId::new();

        let mut first = Tally::create(id);
        first.apply_change(TallyEvent::Added(1));
        repo.save(&mut first, Some(0)).unwrap();

        let mut a = repo.get_by_id(id).unwrap();
        let mut b = repo.get_by_id(id).unwrap();
        a.apply_change(TallyEvent::Added(10));
        b.apply_change(TallyEvent::Reset);

        let expected_a = a.committed_version();
        repo.save(&mut a, Some(expected_a)).unwrap();

        let expected_b = b.committed_version();
        let err = repo.save(&mut b, Some(expected_b)).unwrap_err();
        assert_eq!(
            err,
            DomainError::ConcurrencyConflict {
                expected: 1,
                actual: 2
            }
        );
        assert!(err.is_retryable());
        // the rejected writer keeps its changes for a retry
        assert_eq!(b.uncommitted_changes(), &[TallyEvent::Reset]);
        assert_eq!(repo.stream_version(id).unwrap(), 2);
    }

    #[test]
    fn test_unchecked_save_appends() {
        let repo: EventSourcedRepository<Tally> = EventSourcedRepository::new();
        let id = AggregateId::new();
        let mut tally = Tally::create(id);
        tally.apply_change(TallyEvent::Added(1));
        repo.save(&mut tally, None).unwrap();
        tally.apply_change(TallyEvent::Added(1));
        repo.save(&mut tally, None).unwrap();

        assert_eq!(repo.get_by_id(id).unwrap().total, 2);
    }

    #[test]
    fn test_clones_share_storage() {
        let repo: EventSourcedRepository<Tally> = EventSourcedRepository::new();
        let shared = repo.clone();
        let id = AggregateId::new();

        let mut tally = Tally::create(id);
        tally.apply_change(TallyEvent::Added(9));
        repo.save(&mut tally, Some(0)).unwrap();

        assert_eq!(shared.get_by_id(id).unwrap().total, 9);
    }
}
