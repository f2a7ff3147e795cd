// Copyright 2025 Cowboy AI, LLC.

//! Error types for pattern evaluation and domain operations

use crate::afa::{Ticks, Window};
use thiserror::Error;

/// Errors raised while evaluating an automaton over a window
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// An input event does not span exactly one tick
    #[error("Non-point event: start {start}, end {end} (expected end = start + 1 tick)")]
    NonPointEvent {
        /// Start time of the offending event
        start: Ticks,
        /// End time of the offending event
        end: Ticks,
    },

    /// An input event starts outside the window it was delivered with
    #[error("Event at {start} lies outside window {window}")]
    EventOutsideWindow {
        /// Start time of the offending event
        start: Ticks,
        /// The window being evaluated
        window: Window,
    },

    /// A window or window specification is empty or inverted
    #[error("Invalid window: {reason}")]
    InvalidWindow {
        /// Why the window was rejected
        reason: String,
    },

    /// A generation would hold more runs than the configured limit
    #[error("Run limit exceeded: limit {limit}, attempted {attempted}")]
    RunLimitExceeded {
        /// Configured maximum number of active runs
        limit: usize,
        /// Number of runs the generation tried to hold
        attempted: usize,
    },

    /// A timestamp cannot be expressed in ticks
    #[error("Time out of tick range: {0}")]
    TimeOutOfRange(String),

    /// Configuration could not be loaded
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for pattern evaluation
pub type PatternResult<T> = Result<T, PatternError>;

impl From<serde_json::Error> for PatternError {
    fn from(err: serde_json::Error) -> Self {
        PatternError::InvalidConfig(err.to_string())
    }
}

/// Errors that can occur in domain operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Aggregate not found
    #[error("Aggregate not found: {0}")]
    AggregateNotFound(String),

    /// Invalid state transition
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Current state
        from: String,
        /// Attempted target state
        to: String,
    },

    /// Business rule violation
    #[error("Business rule violation: {rule}")]
    BusinessRuleViolation {
        /// Description of the violated rule
        rule: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Concurrency conflict
    #[error("Concurrency conflict: expected version {expected}, but found {actual}")]
    ConcurrencyConflict {
        /// Expected version
        expected: u64,
        /// Actual version
        actual: u64,
    },

    /// Generic internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Create a business rule violation
    pub fn rule(rule: impl Into<String>) -> Self {
        DomainError::BusinessRuleViolation { rule: rule.into() }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::AggregateNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            DomainError::ValidationError(_)
                | DomainError::BusinessRuleViolation { .. }
                | DomainError::InvalidStateTransition { .. }
        )
    }

    /// Check if this is a concurrency error
    pub fn is_concurrency_error(&self) -> bool {
        matches!(self, DomainError::ConcurrencyConflict { .. })
    }

    /// Whether the caller should reload the aggregate and reapply the command
    pub fn is_retryable(&self) -> bool {
        self.is_concurrency_error()
    }
}
