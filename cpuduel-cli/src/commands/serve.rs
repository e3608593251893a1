// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `cpuduel serve` command - Start the HTTP gateway.

use std::net::SocketAddr;

use cpuduel_core::Config;

pub async fn execute(
    mut config: Config,
    listen: Option<SocketAddr>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(addr) = listen {
        config.server.listen = addr;
    }

    tracing::info!(
        listen = %config.server.listen,
        actor = %config.actor.name,
        mailbox_capacity = config.actor.mailbox_capacity,
        payload_budget_bytes = config.runner.payload_budget_bytes,
        "Starting gateway"
    );

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                         CPUDUEL                              ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("  ● worker         → http://{}/api/worker-cpu", config.server.listen);
    println!("  ● durable-object → http://{}/api/do-cpu", config.server.listen);
    println!("  ● metrics        → http://{}/metrics", config.server.listen);
    println!();
    println!("Press Ctrl+C to stop...");

    cpuduel_cli::start_gateway(&config)
        .await
        .map_err(|e| -> Box<dyn std::error::Error> { e })?;

    Ok(())
}
