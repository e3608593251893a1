// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Custom error types for cpuduel.
//!
//! Explicit enum error types only. No `Box<dyn Error>`, no `anyhow::Result`
//! in library code.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for cpuduel.
#[derive(Debug, Error)]
pub enum DuelError {
    // =========================================================================
    // Configuration Errors - Fail-Fast on Invalid Config
    // =========================================================================
    #[error("Hard validation error: {0}")]
    HardValidation(#[from] HardValidationError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Hard validation errors prevent startup.
/// Raised only for operator configuration, never for request parameters.
#[derive(Debug, Error)]
pub enum HardValidationError {
    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Field {field} out of bounds: {value} (min: {min}, max: {max})")]
    OutOfBounds {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}

/// Faults raised while running the CPU task.
///
/// The runner never recovers from these; the backend that hosted the run
/// turns them into a 500 envelope.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Payload budget exceeded: estimated {estimated_bytes} bytes per loop, budget is {budget_bytes} bytes")]
    PayloadBudgetExceeded {
        estimated_bytes: u64,
        budget_bytes: u64,
    },

    #[error("Serialization failed: {reason}")]
    Serialize { reason: String },

    #[error("Task aborted: {reason}")]
    Aborted { reason: String },
}

impl From<serde_json::Error> for TaskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize {
            reason: err.to_string(),
        }
    }
}

/// Result type alias using DuelError.
pub type DuelResult<T> = Result<T, DuelError>;
