// Copyright 2025 Cowboy AI, LLC.

//! Operator configuration

use crate::errors::PatternResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Evaluation limits for an [`AfaOperator`](super::AfaOperator)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AfaConfig {
    /// Fail the window once a generation holds more runs than this
    pub max_active_runs: Option<usize>,
}

impl AfaConfig {
    /// Load configuration from a JSON document; missing fields take defaults
    pub fn from_json_str(json: &str) -> PatternResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder-style run limit
    pub fn with_max_active_runs(mut self, limit: usize) -> Self {
        self.max_active_runs = Some(limit);
        self
    }
}
