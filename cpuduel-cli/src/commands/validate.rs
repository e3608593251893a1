// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `cpuduel validate` command - Validate configuration file.

use cpuduel_core::ConfigLoader;

pub async fn execute(file: &str) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(file = %file, "Validating configuration");

    match ConfigLoader::load_file(file) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Server Settings:");
            println!("  Listen:             {}", config.server.listen);
            println!("  Service Name:       {}", config.server.service_name);
            println!();
            println!("Actor Settings:");
            println!("  Name:               {}", config.actor.name);
            println!("  Mailbox Capacity:   {}", config.actor.mailbox_capacity);
            println!();
            println!("Runner Settings:");
            println!(
                "  Payload Budget:     {} bytes",
                config.runner.payload_budget_bytes
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
