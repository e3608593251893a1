// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! cpuduel Core Library
//!
//! Deterministic serialization workload, parameter resolver, task runner and
//! configuration for comparing a stateless handler against a single-instance
//! actor.

pub mod config;
pub mod error;
pub mod params;
pub mod runner;
pub mod types;
pub mod workload;

// Re-export commonly used types
pub use config::{ActorConfig, Config, ConfigLoader, RunnerConfig, ServerConfig};
pub use error::{DuelError, DuelResult, HardValidationError, TaskError};
pub use params::{CpuParams, RawCpuQuery};
pub use runner::{RunReport, TaskRunner};
pub use types::{ActorName, Mode};
pub use workload::{Workload, WorkloadItem};
