// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `cpuduel run` command - One-shot run through the dispatcher.
//!
//! Goes through the same backend as the HTTP endpoint for `mode` and prints
//! the response envelope.

use cpuduel_cli::Dispatcher;
use cpuduel_core::{Config, Mode, RawCpuQuery};

pub async fn execute(
    config: &Config,
    mode: Mode,
    raw: RawCpuQuery,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(mode = %mode, "Running CPU task");

    let dispatcher = Dispatcher::new(config);
    let outcome = dispatcher.dispatch(mode, raw).await;

    println!("{}", serde_json::to_string_pretty(&outcome.body)?);

    if !outcome.is_success() {
        return Err(format!("{} run failed with status {}", mode, outcome.status).into());
    }

    Ok(())
}
