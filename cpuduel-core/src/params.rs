// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Parameter resolution with default-on-invalid, cap-on-overflow policy.
//!
//! Request parameters are untrusted and never rejected. Anything that is not
//! a positive finite number falls back to the default for that field, and
//! anything above the field maximum is capped.

use serde::{Deserialize, Serialize};

/// Validated workload parameters.
///
/// Every field is in `1..=max` for that field. Instances only come out of
/// [`CpuParams::resolve`] or the associated constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuParams {
    pub items: u32,
    pub item_size: u32,
    pub loops: u32,
}

impl CpuParams {
    /// Values substituted for missing or invalid input.
    pub const DEFAULT: CpuParams = CpuParams {
        items: 8000,
        item_size: 256,
        loops: 6,
    };

    /// Upper bound per field.
    pub const MAX: CpuParams = CpuParams {
        items: 200_000,
        item_size: 2048,
        loops: 100,
    };

    /// Resolve raw numeric input into a valid parameter triple.
    ///
    /// Total: never fails. Each field is resolved independently.
    pub fn resolve(raw_items: f64, raw_item_size: f64, raw_loops: f64) -> Self {
        Self {
            items: clamp_field(raw_items, Self::DEFAULT.items, Self::MAX.items),
            item_size: clamp_field(raw_item_size, Self::DEFAULT.item_size, Self::MAX.item_size),
            loops: clamp_field(raw_loops, Self::DEFAULT.loops, Self::MAX.loops),
        }
    }

    /// Encode as a query string (`items=..&itemSize=..&loops=..`).
    pub fn to_query_string(&self) -> String {
        format!(
            "items={}&itemSize={}&loops={}",
            self.items, self.item_size, self.loops
        )
    }
}

impl Default for CpuParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Raw query values exactly as received, before numeric conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCpuQuery {
    pub items: Option<String>,
    pub item_size: Option<String>,
    pub loops: Option<String>,
}

impl RawCpuQuery {
    /// Collect the three known keys from decoded query pairs.
    ///
    /// Unknown keys are ignored. When a key repeats, the first value wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "items" => &mut raw.items,
                "itemSize" => &mut raw.item_size,
                "loops" => &mut raw.loops,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        raw
    }

    /// Convert to numbers and apply the clamp policy.
    pub fn resolve(&self) -> CpuParams {
        CpuParams::resolve(
            parse_number(self.items.as_deref()),
            parse_number(self.item_size.as_deref()),
            parse_number(self.loops.as_deref()),
        )
    }
}

/// Convert query text to a number.
///
/// Absent or blank input is 0. `0x`, `0o` and `0b` prefixes select a radix.
/// Anything unparseable is NaN.
pub fn parse_number(raw: Option<&str>) -> f64 {
    let text = match raw {
        Some(text) => text.trim(),
        None => return 0.0,
    };

    if text.is_empty() {
        return 0.0;
    }

    let radix = match text.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };

    match radix {
        Some(radix) => parse_radix(&text[2..], radix),
        None => match text {
            "Infinity" | "+Infinity" => f64::INFINITY,
            "-Infinity" => f64::NEG_INFINITY,
            _ => text.parse::<f64>().unwrap_or(f64::NAN),
        },
    }
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
    })
    .unwrap_or(f64::NAN)
}

fn clamp_field(value: f64, fallback: u32, max: u32) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return fallback;
    }
    let floored = value.floor();
    // (0, 1) floors to zero, which is not a valid count
    if floored < 1.0 {
        return fallback;
    }
    if floored >= max as f64 {
        max
    } else {
        floored as u32
    }
}
