// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers for validated inputs.
//!
//! All types validate their invariants at creation time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::HardValidationError;

/// Logical name of the singleton actor used by the actor backend.
pub const DEFAULT_ACTOR_NAME: &str = "cpu-task";

/// Validated logical actor name.
/// Must be non-empty, alphanumeric with hyphens/underscores, max 64 chars.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActorName(String);

impl ActorName {
    /// Create a new ActorName with validation.
    pub fn new(name: impl Into<String>) -> Result<Self, HardValidationError> {
        let name = name.into();

        if name.is_empty() {
            return Err(HardValidationError::InvalidFieldValue {
                field: "actor_name",
                value: name,
                reason: "Actor name cannot be empty".to_string(),
            });
        }

        if name.len() > 64 {
            return Err(HardValidationError::InvalidFieldValue {
                field: "actor_name",
                value: name.clone(),
                reason: format!("Actor name too long: {} chars (max 64)", name.len()),
            });
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(HardValidationError::InvalidFieldValue {
                field: "actor_name",
                value: name,
                reason: "Actor name must contain only alphanumeric characters, hyphens, and underscores".to_string(),
            });
        }

        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ActorName {
    fn default() -> Self {
        Self(DEFAULT_ACTOR_NAME.to_string())
    }
}

impl fmt::Display for ActorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ActorName {
    type Error = HardValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ActorName> for String {
    fn from(name: ActorName) -> Self {
        name.0
    }
}

/// Execution context a run was hosted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Stateless, request-scoped handler.
    #[serde(rename = "worker")]
    Worker,
    /// Single-instance actor reached through the actor namespace.
    #[serde(rename = "durable-object")]
    DurableObject,
}

impl Mode {
    /// Wire tag used in envelopes and metric labels.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Worker => "worker",
            Self::DurableObject => "durable-object",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = HardValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "worker" => Ok(Self::Worker),
            "durable-object" | "do" => Ok(Self::DurableObject),
            other => Err(HardValidationError::InvalidFieldValue {
                field: "mode",
                value: other.to_string(),
                reason: "Expected 'worker' or 'durable-object'".to_string(),
            }),
        }
    }
}
