// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! CPU task runner.
//!
//! Generates and serializes one workload per loop, folds the serialized
//! lengths into a 32-bit XOR checksum, and records elapsed time on both a
//! monotonic and a wall clock.

use std::sync::OnceLock;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::TaskError;
use crate::params::CpuParams;
use crate::workload::Workload;

/// Default per-loop payload budget: 1 GiB.
pub const DEFAULT_PAYLOAD_BUDGET_BYTES: u64 = 1024 * 1024 * 1024;

/// Upper bound on JSON overhead per item, excluding the label text.
const ITEM_OVERHEAD_BYTES: u64 = 96;
/// Upper bound on the envelope around the item array.
const ENVELOPE_OVERHEAD_BYTES: u64 = 64;

static MONOTONIC_ORIGIN: OnceLock<Instant> = OnceLock::new();

/// Milliseconds since the process-wide monotonic origin.
///
/// Every backend in the process shares the same origin, so intervals from
/// different runs are directly comparable.
pub fn monotonic_ms() -> f64 {
    let origin = MONOTONIC_ORIGIN.get_or_init(Instant::now);
    origin.elapsed().as_secs_f64() * 1000.0
}

/// Milliseconds since the Unix epoch.
pub fn wall_clock_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Outcome of a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub params: CpuParams,
    pub elapsed_ms: f64,
    pub wall_ms: i64,
    pub elapsed_us: i64,
    pub wall_us: i64,
    pub checksum: i32,
    pub started_at: f64,
    pub ended_at: f64,
    pub wall_started_at: i64,
    pub wall_ended_at: i64,
}

/// Runs the serialization task under a payload budget.
#[derive(Debug, Clone, Copy)]
pub struct TaskRunner {
    payload_budget_bytes: u64,
}

impl TaskRunner {
    /// Create a runner with the given per-loop payload budget.
    pub fn new(payload_budget_bytes: u64) -> Self {
        Self {
            payload_budget_bytes,
        }
    }

    /// Run the task for `params`.
    pub fn run(&self, params: CpuParams) -> Result<RunReport, TaskError> {
        let estimated_bytes = estimate_payload_bytes(&params);
        if estimated_bytes > self.payload_budget_bytes {
            return Err(TaskError::PayloadBudgetExceeded {
                estimated_bytes,
                budget_bytes: self.payload_budget_bytes,
            });
        }

        let started_at = monotonic_ms();
        let wall_started_at = wall_clock_ms();
        let mut checksum: i32 = 0;

        for seed in 0..params.loops {
            let json = Workload::generate(params.items, params.item_size, seed).to_json()?;
            checksum = fold_checksum(checksum, json.len(), seed);
        }

        let ended_at = monotonic_ms();
        let wall_ended_at = wall_clock_ms();

        let elapsed_ms = ended_at - started_at;
        let wall_ms = wall_ended_at - wall_started_at;

        tracing::debug!(
            items = params.items,
            item_size = params.item_size,
            loops = params.loops,
            elapsed_ms,
            checksum,
            "CPU task finished"
        );

        Ok(RunReport {
            params,
            elapsed_ms,
            wall_ms,
            elapsed_us: (elapsed_ms * 1000.0).round() as i64,
            wall_us: wall_ms * 1000,
            checksum,
            started_at,
            ended_at,
            wall_started_at,
            wall_ended_at,
        })
    }
}

impl Default for TaskRunner {
    fn default() -> Self {
        Self::new(DEFAULT_PAYLOAD_BUDGET_BYTES)
    }
}

/// Upper-bound estimate of one serialized workload.
pub fn estimate_payload_bytes(params: &CpuParams) -> u64 {
    params.items as u64 * (params.item_size as u64 + ITEM_OVERHEAD_BYTES) + ENVELOPE_OVERHEAD_BYTES
}

/// XOR `(len + loop)` into the accumulator with 32-bit wraparound.
pub fn fold_checksum(checksum: i32, serialized_len: usize, loop_index: u32) -> i32 {
    let term = (serialized_len as u64).wrapping_add(loop_index as u64) as u32 as i32;
    checksum ^ term
}
