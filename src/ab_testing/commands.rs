// Copyright 2025 Cowboy AI, LLC.

//! Commands for A/B tests and their handler

use super::aggregate::AbTest;
use crate::commands::DomainCommand;
use crate::entity::AggregateRoot;
use crate::errors::DomainResult;
use crate::identifiers::AggregateId;
use crate::repository::Repository;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Requests to change an A/B test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbTestCommand {
    /// Define a new test
    CreateTest {
        /// Identity of the new test
        test_id: AggregateId,
        /// Human-readable name
        name: String,
        /// Variant labels
        variants: Vec<String>,
    },
    /// Open a drafted test
    StartTest {
        /// Target test
        test_id: AggregateId,
    },
    /// Assign a participant to a variant
    AssignVariant {
        /// Target test
        test_id: AggregateId,
        /// Participant key
        participant: String,
        /// Variant label
        variant: String,
    },
    /// Record a participant's conversion
    RecordConversion {
        /// Target test
        test_id: AggregateId,
        /// Participant key
        participant: String,
    },
    /// End a running test
    ConcludeTest {
        /// Target test
        test_id: AggregateId,
        /// Winning variant label
        winner: String,
    },
}

impl AbTestCommand {
    /// The test this command targets
    pub fn test_id(&self) -> AggregateId {
        match self {
            AbTestCommand::CreateTest { test_id, .. }
            | AbTestCommand::StartTest { test_id }
            | AbTestCommand::AssignVariant { test_id, .. }
            | AbTestCommand::RecordConversion { test_id, .. }
            | AbTestCommand::ConcludeTest { test_id, .. } => *test_id,
        }
    }
}

impl DomainCommand for AbTestCommand {
    fn command_type(&self) -> &'static str {
        match self {
            AbTestCommand::CreateTest { .. } => "CreateTest",
            AbTestCommand::StartTest { .. } => "StartTest",
            AbTestCommand::AssignVariant { .. } => "AssignVariant",
            AbTestCommand::RecordConversion { .. } => "RecordConversion",
            AbTestCommand::ConcludeTest { .. } => "ConcludeTest",
        }
    }
}

/// Loads the target test, runs the behavior, saves with the loaded version
pub struct AbTestCommandHandler;

impl AbTestCommandHandler {
    /// Handle one command against `repository`
    ///
    /// `CreateTest` starts from a fresh aggregate when the id has no history;
    /// every other command requires an existing test.
    pub fn handle<R>(command: AbTestCommand, repository: &R) -> DomainResult<()>
    where
        R: Repository<AbTest> + ?Sized,
    {
        let test_id = command.test_id();
        let mut test = match &command {
            AbTestCommand::CreateTest { .. } => match repository.get_by_id(test_id) {
                Ok(existing) => existing,
                Err(err) if err.is_not_found() => AbTest::create(test_id),
                Err(err) => return Err(err),
            },
            _ => repository.get_by_id(test_id)?,
        };
        let expected_version = test.committed_version();

        match &command {
            AbTestCommand::CreateTest { name, variants, .. } => test.define(name, variants)?,
            AbTestCommand::StartTest { .. } => test.start()?,
            AbTestCommand::AssignVariant {
                participant,
                variant,
                ..
            } => test.assign(participant, variant)?,
            AbTestCommand::RecordConversion { participant, .. } => {
                test.record_conversion(participant)?
            }
            AbTestCommand::ConcludeTest { winner, .. } => test.conclude(winner)?,
        }

        debug!(
            test_id = %test_id,
            command = command.command_type(),
            events = test.uncommitted_changes().len(),
            "ab test command handled"
        );
        repository.save(&mut test, Some(expected_version))
    }
}
