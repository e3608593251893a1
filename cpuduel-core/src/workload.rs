// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Deterministic synthetic workload.
//!
//! The same `(items, item_size, seed)` always produces the same structure,
//! and therefore byte-identical JSON.

use serde::Serialize;

/// Knuth multiplicative hash constant.
const KNUTH_MULTIPLIER: u32 = 2_654_435_761;

/// Per-item metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemMeta {
    pub index: u32,
    pub seed: u32,
    pub hash: u32,
}

/// A single generated element.
///
/// Field order is the serialization order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkloadItem {
    pub id: u32,
    pub label: String,
    pub meta: ItemMeta,
}

/// One loop's worth of synthetic data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workload {
    pub seed: u32,
    pub data: Vec<WorkloadItem>,
}

impl Workload {
    /// Build the workload for `seed`.
    pub fn generate(items: u32, item_size: u32, seed: u32) -> Self {
        let repeat_char = char::from(b'a' + (seed % 26) as u8);
        let base_text: String = std::iter::repeat(repeat_char)
            .take(item_size as usize)
            .collect();

        let data = (0..items)
            .map(|i| WorkloadItem {
                id: i,
                label: format!("{}-{}", base_text, i),
                meta: ItemMeta {
                    index: i,
                    seed,
                    hash: knuth_hash(i),
                },
            })
            .collect();

        Self { seed, data }
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// `(i * 2654435761) mod 2^32`.
pub fn knuth_hash(i: u32) -> u32 {
    i.wrapping_mul(KNUTH_MULTIPLIER)
}
