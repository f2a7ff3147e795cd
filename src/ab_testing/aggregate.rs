// Copyright 2025 Cowboy AI, LLC.

//! The A/B test aggregate

use crate::entity::{AggregateRoot, Changes};
use crate::errors::{DomainError, DomainResult};
use crate::events::DomainEvent;
use crate::identifiers::AggregateId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Facts recorded by an A/B test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbTestEvent {
    /// The test was defined with its variants
    TestCreated {
        /// Human-readable name
        name: String,
        /// Variant labels, at least two, distinct
        variants: Vec<String>,
    },
    /// Participants may now be assigned
    TestStarted,
    /// A participant was put into a variant
    VariantAssigned {
        /// Participant key
        participant: String,
        /// Variant label
        variant: String,
    },
    /// An assigned participant converted
    ConversionRecorded {
        /// Participant key
        participant: String,
    },
    /// The test ended with a winning variant
    TestConcluded {
        /// Winning variant label
        winner: String,
    },
}

impl DomainEvent for AbTestEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AbTestEvent::TestCreated { .. } => "TestCreated",
            AbTestEvent::TestStarted => "TestStarted",
            AbTestEvent::VariantAssigned { .. } => "VariantAssigned",
            AbTestEvent::ConversionRecorded { .. } => "ConversionRecorded",
            AbTestEvent::TestConcluded { .. } => "TestConcluded",
        }
    }
}

/// Lifecycle of an A/B test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbTestStatus {
    /// Not created yet
    Undefined,
    /// Created, not started
    Draft,
    /// Accepting assignments and conversions
    Running,
    /// Terminal
    Concluded,
}

impl AbTestStatus {
    /// Get the name of this state for errors and logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::Undefined => "Undefined",
            Self::Draft => "Draft",
            Self::Running => "Running",
            Self::Concluded => "Concluded",
        }
    }

    /// Check if a transition to the target state is valid
    pub fn can_transition_to(&self, target: &Self) -> bool {
        use AbTestStatus::*;
        matches!(
            (self, target),
            (Undefined, Draft) | (Draft, Running) | (Running, Concluded)
        )
    }

    fn ensure_transition(&self, target: Self) -> DomainResult<()> {
        if self.can_transition_to(&target) {
            Ok(())
        } else {
            Err(DomainError::InvalidStateTransition {
                from: self.name().to_string(),
                to: target.name().to_string(),
            })
        }
    }
}

/// An experiment comparing variants by conversion
#[derive(Debug, Clone, PartialEq)]
pub struct AbTest {
    id: AggregateId,
    status: AbTestStatus,
    name: String,
    variants: Vec<String>,
    assignments: BTreeMap<String, String>,
    converted: BTreeSet<String>,
    winner: Option<String>,
    changes: Changes<AbTestEvent>,
}

impl AbTest {
    /// Current lifecycle state
    pub fn status(&self) -> AbTestStatus {
        self.status
    }

    /// Test name, empty until created
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variant labels in definition order
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Variant a participant was assigned to
    pub fn variant_of(&self, participant: &str) -> Option<&str> {
        self.assignments.get(participant).map(String::as_str)
    }

    /// Conversions counted per variant, zero for variants without any
    pub fn conversions(&self) -> BTreeMap<String, u64> {
        let mut counts: BTreeMap<String, u64> =
            self.variants.iter().map(|v| (v.clone(), 0)).collect();
        for participant in &self.converted {
            if let Some(variant) = self.assignments.get(participant) {
                *counts.entry(variant.clone()).or_default() += 1;
            }
        }
        counts
    }

    /// Winning variant once concluded
    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    /// Define the test
    pub fn define(&mut self, name: &str, variants: &[String]) -> DomainResult<()> {
        self.status.ensure_transition(AbTestStatus::Draft)?;
        if name.trim().is_empty() {
            return Err(DomainError::ValidationError("test name is empty".into()));
        }
        let distinct: BTreeSet<&String> = variants.iter().collect();
        if distinct.len() < 2 || distinct.len() != variants.len() {
            return Err(DomainError::rule("a test needs at least two distinct variants"));
        }

        self.apply_change(AbTestEvent::TestCreated {
            name: name.to_string(),
            variants: variants.to_vec(),
        });
        Ok(())
    }

    /// Open the test for participants
    pub fn start(&mut self) -> DomainResult<()> {
        self.status.ensure_transition(AbTestStatus::Running)?;
        self.apply_change(AbTestEvent::TestStarted);
        Ok(())
    }

    /// Put a participant into a variant
    pub fn assign(&mut self, participant: &str, variant: &str) -> DomainResult<()> {
        self.ensure_running()?;
        if !self.variants.iter().any(|v| v == variant) {
            return Err(DomainError::rule(format!("unknown variant '{variant}'")));
        }
        if self.assignments.contains_key(participant) {
            return Err(DomainError::rule(format!(
                "participant '{participant}' is already assigned"
            )));
        }

        self.apply_change(AbTestEvent::VariantAssigned {
            participant: participant.to_string(),
            variant: variant.to_string(),
        });
        Ok(())
    }

    /// Count a conversion for an assigned participant, once
    pub fn record_conversion(&mut self, participant: &str) -> DomainResult<()> {
        self.ensure_running()?;
        if !self.assignments.contains_key(participant) {
            return Err(DomainError::rule(format!(
                "participant '{participant}' was never assigned"
            )));
        }
        if self.converted.contains(participant) {
            return Err(DomainError::rule(format!(
                "participant '{participant}' already converted"
            )));
        }

        self.apply_change(AbTestEvent::ConversionRecorded {
            participant: participant.to_string(),
        });
        Ok(())
    }

    /// End the test with a winner
    pub fn conclude(&mut self, winner: &str) -> DomainResult<()> {
        self.status.ensure_transition(AbTestStatus::Concluded)?;
        if !self.variants.iter().any(|v| v == winner) {
            return Err(DomainError::rule(format!("unknown variant '{winner}'")));
        }

        self.apply_change(AbTestEvent::TestConcluded {
            winner: winner.to_string(),
        });
        Ok(())
    }

    fn ensure_running(&self) -> DomainResult<()> {
        if self.status == AbTestStatus::Running {
            Ok(())
        } else {
            Err(DomainError::rule(format!(
                "test is {}, not Running",
                self.status.name()
            )))
        }
    }
}

impl AggregateRoot for AbTest {
    type Event = AbTestEvent;

    fn create(id: AggregateId) -> Self {
        Self {
            id,
            status: AbTestStatus::Undefined,
            name: String::new(),
            variants: Vec::new(),
            assignments: BTreeMap::new(),
            converted: BTreeSet::new(),
            winner: None,
            changes: Changes::default(),
        }
    }

    fn id(&self) -> AggregateId {
        self.id
    }

    fn apply(&mut self, event: &AbTestEvent) {
        match event {
            AbTestEvent::TestCreated { name, variants } => {
                self.status = AbTestStatus::Draft;
                self.name = name.clone();
                self.variants = variants.clone();
            }
            AbTestEvent::TestStarted => self.status = AbTestStatus::Running,
            AbTestEvent::VariantAssigned {
                participant,
                variant,
            } => {
                self.assignments.insert(participant.clone(), variant.clone());
            }
            AbTestEvent::ConversionRecorded { participant } => {
                self.converted.insert(participant.clone());
            }
            AbTestEvent::TestConcluded { winner } => {
                self.status = AbTestStatus::Concluded;
                self.winner = Some(winner.clone());
            }
        }
    }

    fn changes(&self) -> &Changes<AbTestEvent> {
        &self.changes
    }

    fn changes_mut(&mut self) -> &mut Changes<AbTestEvent> {
        &mut self.changes
    }
}
