// Copyright 2025 Cowboy AI, LLC.

//! Sagas: aggregates that issue commands in reaction to their own events
//!
//! Whether a reaction's commands are kept depends on an explicit
//! [`ApplyMode`] passed into the replay, never on a flag stored in the saga.
//! Replaying history runs every reaction in [`ApplyMode::Replay`], where the
//! [`CommandIssuer`] drops commands, so a rebuilt saga never issues a command
//! twice.

use crate::commands::DomainCommand;
use crate::entity::AggregateRoot;
use crate::events::DomainEvent;
use crate::identifiers::CorrelationId;
use tracing::trace;

/// Whether events are being replayed from history or applied live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Rebuilding from committed history; commands are suppressed
    Replay,
    /// Handling new events; commands are recorded
    Live,
}

/// Commands issued by a saga and not yet dispatched
#[derive(Debug, Clone, PartialEq)]
pub struct Outbox<C> {
    unissued: Vec<C>,
}

impl<C> Default for Outbox<C> {
    fn default() -> Self {
        Self {
            unissued: Vec::new(),
        }
    }
}

impl<C> Outbox<C> {
    /// Commands waiting for dispatch, in issue order
    pub fn unissued(&self) -> &[C] {
        &self.unissued
    }
}

/// Sink handed to [`Saga::react`]
pub struct CommandIssuer<'a, C> {
    mode: ApplyMode,
    issued: &'a mut Vec<C>,
}

impl<'a, C: DomainCommand> CommandIssuer<'a, C> {
    fn new(mode: ApplyMode, issued: &'a mut Vec<C>) -> Self {
        Self { mode, issued }
    }

    /// The mode the current event is applied in
    pub fn mode(&self) -> ApplyMode {
        self.mode
    }

    /// Issue a command; dropped while replaying
    pub fn issue(&mut self, command: C) {
        match self.mode {
            ApplyMode::Live => self.issued.push(command),
            ApplyMode::Replay => {
                trace!(command = command.command_type(), "command suppressed during replay");
            }
        }
    }
}

/// An aggregate that reacts to its events by issuing commands
pub trait Saga: AggregateRoot {
    /// Commands this saga issues
    type Command: DomainCommand;

    /// Correlation of the flow this saga coordinates
    fn correlation_id(&self) -> CorrelationId;

    /// Commands issued since construction
    fn outbox(&self) -> &Outbox<Self::Command>;

    /// Mutable access for the provided methods
    fn outbox_mut(&mut self) -> &mut Outbox<Self::Command>;

    /// Issue commands in response to an already applied event
    fn react(&self, event: &Self::Event, commands: &mut CommandIssuer<'_, Self::Command>);

    /// Apply events in the given mode
    ///
    /// Replay advances the version without recording uncommitted events;
    /// live application records them and keeps the issued commands.
    fn replay(&mut self, events: impl IntoIterator<Item = Self::Event>, mode: ApplyMode) {
        for event in events {
            self.apply(&event);
            let mut issued = Vec::new();
            self.react(&event, &mut CommandIssuer::new(mode, &mut issued));
            trace!(
                event = event.event_type(),
                issued = issued.len(),
                ?mode,
                "saga event applied"
            );
            match mode {
                ApplyMode::Replay => self.changes_mut().advance(),
                ApplyMode::Live => self.changes_mut().record(event),
            }
            self.outbox_mut().unissued.extend(issued);
        }
    }

    /// Rebuild from committed history without issuing any command
    fn load_saga_history(&mut self, history: impl IntoIterator<Item = Self::Event>) {
        self.replay(history, ApplyMode::Replay);
    }

    /// Apply a new event live: record it and keep the commands it triggers
    fn apply_saga_change(&mut self, event: Self::Event) {
        self.replay(std::iter::once(event), ApplyMode::Live);
    }

    /// Issue a command directly from a behavior method; dropped under replay
    fn issue_command(&mut self, mode: ApplyMode, command: Self::Command) {
        CommandIssuer::new(mode, &mut self.outbox_mut().unissued).issue(command);
    }

    /// Commands issued live since construction, in order
    fn unissued_commands(&self) -> &[Self::Command] {
        self.outbox().unissued()
    }

    /// Hand the unissued commands to a dispatcher, clearing them
    fn take_unissued_commands(&mut self) -> Vec<Self::Command> {
        std::mem::take(&mut self.outbox_mut().unissued)
    }
}
