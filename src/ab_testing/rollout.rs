// Copyright 2025 Cowboy AI, LLC.

//! Rollout saga: promotes the winner of a concluded test

use super::aggregate::AbTestEvent;
use crate::commands::DomainCommand;
use crate::entity::{AggregateRoot, Changes};
use crate::errors::{DomainError, DomainResult};
use crate::events::{DomainEvent, StoredEvent};
use crate::identifiers::{AggregateId, CorrelationId};
use crate::saga::{CommandIssuer, Outbox, Saga};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Facts recorded by a rollout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RolloutEvent {
    /// A winner was picked for promotion
    RolloutScheduled {
        /// The concluded test
        test_id: AggregateId,
        /// Variant to promote
        winner: String,
    },
    /// The promotion was confirmed downstream
    RolloutAcknowledged,
}

impl DomainEvent for RolloutEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RolloutEvent::RolloutScheduled { .. } => "RolloutScheduled",
            RolloutEvent::RolloutAcknowledged => "RolloutAcknowledged",
        }
    }
}

/// Commands a rollout issues
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RolloutCommand {
    /// Make `variant` the default for everyone
    PromoteVariant {
        /// The concluded test
        test_id: AggregateId,
        /// Variant to promote
        variant: String,
    },
}

impl DomainCommand for RolloutCommand {
    fn command_type(&self) -> &'static str {
        match self {
            RolloutCommand::PromoteVariant { .. } => "PromoteVariant",
        }
    }
}

/// Where a rollout stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RolloutStatus {
    /// Waiting for a concluded test
    Pending,
    /// Promotion requested
    Scheduled,
    /// Promotion confirmed
    Acknowledged,
}

/// Saga following one test from conclusion to promoted winner
#[derive(Debug)]
pub struct RolloutSaga {
    id: AggregateId,
    status: RolloutStatus,
    test_id: Option<AggregateId>,
    winner: Option<String>,
    changes: Changes<RolloutEvent>,
    outbox: Outbox<RolloutCommand>,
}

impl RolloutSaga {
    /// Current status
    pub fn status(&self) -> RolloutStatus {
        self.status
    }

    /// The test being rolled out, once scheduled
    pub fn test_id(&self) -> Option<AggregateId> {
        self.test_id
    }

    /// The variant being promoted, once scheduled
    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    /// Schedule promotion of `winner`
    pub fn schedule(&mut self, test_id: AggregateId, winner: &str) -> DomainResult<()> {
        if self.status != RolloutStatus::Pending {
            return Err(DomainError::rule("rollout already scheduled"));
        }
        self.apply_saga_change(RolloutEvent::RolloutScheduled {
            test_id,
            winner: winner.to_string(),
        });
        Ok(())
    }

    /// Confirm the promotion happened
    pub fn acknowledge(&mut self) -> DomainResult<()> {
        if self.status != RolloutStatus::Scheduled {
            return Err(DomainError::InvalidStateTransition {
                from: format!("{:?}", self.status),
                to: "Acknowledged".to_string(),
            });
        }
        self.apply_saga_change(RolloutEvent::RolloutAcknowledged);
        Ok(())
    }
}

impl AggregateRoot for RolloutSaga {
    type Event = RolloutEvent;

    fn create(id: AggregateId) -> Self {
        Self {
            id,
            status: RolloutStatus::Pending,
            test_id: None,
            winner: None,
            changes: Changes::default(),
            outbox: Outbox::default(),
        }
    }

    fn id(&self) -> AggregateId {
        self.id
    }

    fn apply(&mut self, event: &RolloutEvent) {
        match event {
            RolloutEvent::RolloutScheduled { test_id, winner } => {
                self.status = RolloutStatus::Scheduled;
                self.test_id = Some(*test_id);
                self.winner = Some(winner.clone());
            }
            RolloutEvent::RolloutAcknowledged => self.status = RolloutStatus::Acknowledged,
        }
    }

    fn changes(&self) -> &Changes<RolloutEvent> {
        &self.changes
    }

    fn changes_mut(&mut self) -> &mut Changes<RolloutEvent> {
        &mut self.changes
    }
}

impl Saga for RolloutSaga {
    type Command = RolloutCommand;

    fn correlation_id(&self) -> CorrelationId {
        CorrelationId(*self.id.as_uuid())
    }

    fn outbox(&self) -> &Outbox<RolloutCommand> {
        &self.outbox
    }

    fn outbox_mut(&mut self) -> &mut Outbox<RolloutCommand> {
        &mut self.outbox
    }

    fn react(&self, event: &RolloutEvent, commands: &mut CommandIssuer<'_, RolloutCommand>) {
        if let RolloutEvent::RolloutScheduled { test_id, winner } = event {
            commands.issue(RolloutCommand::PromoteVariant {
                test_id: *test_id,
                variant: winner.clone(),
            });
        }
    }
}

/// Routes A/B test events into a rollout saga
pub struct RolloutSagaHandler;

impl RolloutSagaHandler {
    /// Start the rollout when a test concludes; other events are ignored
    pub fn handle(event: &StoredEvent<AbTestEvent>, saga: &mut RolloutSaga) -> DomainResult<()> {
        match &event.event {
            AbTestEvent::TestConcluded { winner } => {
                debug!(
                    test_id = %event.aggregate_id,
                    correlation_id = %saga.correlation_id(),
                    winner = %winner,
                    "scheduling rollout"
                );
                saga.schedule(event.aggregate_id, winner)
            }
            _ => Ok(()),
        }
    }
}
