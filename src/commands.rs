// Copyright 2025 Cowboy AI, LLC.

//! Commands: requests to change state
//!
//! Commands are handled by loading an aggregate, invoking a behavior method
//! that validates business rules and applies events, and saving the result.
//! Sagas issue commands for an external dispatcher to deliver.

use std::fmt::Debug;

/// A request to change state
pub trait DomainCommand: Debug + Send + Sync {
    /// Get the command type name
    fn command_type(&self) -> &'static str;
}
