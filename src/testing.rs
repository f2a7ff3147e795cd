// Copyright 2025 Cowboy AI, LLC.

//! Given/when/then harness for command and saga handlers
//!
//! [`InMemoryTestRepository`] replays a given history for each aggregate and
//! captures whatever a handler saves. It does not check `expected_version`:
//! concurrency is the production repository's concern, not the handler's.

use crate::entity::{rehydrate, AggregateRoot};
use crate::errors::{DomainError, DomainResult};
use crate::identifiers::AggregateId;
use crate::repository::Repository;
use crate::saga::Saga;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

/// Test double: given histories in, saved events out
pub struct InMemoryTestRepository<A: AggregateRoot> {
    given: HashMap<AggregateId, Vec<A::Event>>,
    saved: RwLock<Vec<(AggregateId, A::Event)>>,
}

impl<A: AggregateRoot> Default for InMemoryTestRepository<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: AggregateRoot> InMemoryTestRepository<A> {
    /// Create a repository with no histories
    pub fn new() -> Self {
        Self {
            given: HashMap::new(),
            saved: RwLock::new(Vec::new()),
        }
    }

    /// Seed the history of one aggregate
    pub fn with_history(mut self, id: AggregateId, history: Vec<A::Event>) -> Self {
        self.given.insert(id, history);
        self
    }

    /// Everything handlers saved, in save order
    pub fn saved_events(&self) -> DomainResult<Vec<A::Event>> {
        let saved = self
            .saved
            .read()
            .map_err(|err| DomainError::InternalError(err.to_string()))?;
        Ok(saved.iter().map(|(_, event)| event.clone()).collect())
    }
}

impl<A: AggregateRoot> Repository<A> for InMemoryTestRepository<A> {
    fn get_by_id(&self, id: AggregateId) -> DomainResult<A> {
        self.given
            .get(&id)
            .map(|history| rehydrate(id, history.iter().cloned()))
            .ok_or_else(|| DomainError::AggregateNotFound(id.to_string()))
    }

    fn save(&self, aggregate: &mut A, _expected_version: Option<u64>) -> DomainResult<()> {
        let id = aggregate.id();
        let mut saved = self
            .saved
            .write()
            .map_err(|err| DomainError::InternalError(err.to_string()))?;
        saved.extend(aggregate.take_uncommitted_changes().into_iter().map(|e| (id, e)));
        Ok(())
    }
}

/// A command scenario: history given, handler run, outcome inspected
pub struct Scenario<A: AggregateRoot> {
    repository: InMemoryTestRepository<A>,
}

impl<A: AggregateRoot> Scenario<A> {
    /// Start from `history` for aggregate `id`
    pub fn given(id: AggregateId, history: Vec<A::Event>) -> Self {
        Self {
            repository: InMemoryTestRepository::new().with_history(id, history),
        }
    }

    /// Start with no history at all
    pub fn given_nothing() -> Self {
        Self {
            repository: InMemoryTestRepository::new(),
        }
    }

    /// Run a command handler against the repository
    pub fn when<F>(self, handler: F) -> Outcome<A::Event>
    where
        F: FnOnce(&InMemoryTestRepository<A>) -> DomainResult<()>,
    {
        let result = handler(&self.repository);
        match self.repository.saved_events() {
            Ok(events) => Outcome {
                result,
                events,
                commands: Vec::new(),
            },
            Err(err) => Outcome {
                result: result.and(Err(err)),
                events: Vec::new(),
                commands: Vec::new(),
            },
        }
    }
}

/// A saga scenario: history replayed, event handler run live
pub struct SagaScenario<S: Saga> {
    saga: S,
}

impl<S: Saga> SagaScenario<S> {
    /// Rebuild saga `id` from `history`; replay issues no commands
    pub fn given(id: AggregateId, history: Vec<S::Event>) -> Self {
        let mut saga = S::create(id);
        saga.load_saga_history(history);
        Self { saga }
    }

    /// Run an event handler against the rebuilt saga
    pub fn when<F>(mut self, handler: F) -> Outcome<S::Event, S::Command>
    where
        F: FnOnce(&mut S) -> DomainResult<()>,
    {
        let result = handler(&mut self.saga);
        Outcome {
            result,
            events: self.saga.take_uncommitted_changes(),
            commands: self.saga.take_unissued_commands(),
        }
    }
}

/// What a handler produced
#[derive(Debug)]
pub struct Outcome<E, C = ()> {
    /// The handler's own result
    pub result: DomainResult<()>,
    /// Events recorded by the handler
    pub events: Vec<E>,
    /// Commands issued by the handler
    pub commands: Vec<C>,
}

impl<E: Debug + PartialEq, C: Debug + PartialEq> Outcome<E, C> {
    /// Assert success with exactly these events
    pub fn then_expect(&self, expected: &[E]) -> &Self {
        assert!(self.result.is_ok(), "handler failed: {:?}", self.result);
        assert_eq!(self.events.as_slice(), expected);
        self
    }

    /// Assert exactly these commands were issued
    pub fn then_issued(&self, expected: &[C]) -> &Self {
        assert_eq!(self.commands.as_slice(), expected);
        self
    }

    /// Assert the handler failed with `expected` and recorded nothing
    pub fn then_reject(&self, expected: &DomainError) -> &Self {
        assert_eq!(self.result.as_ref().err(), Some(expected));
        assert!(
            self.events.is_empty(),
            "rejected command recorded events: {:?}",
            self.events
        );
        self
    }
}
