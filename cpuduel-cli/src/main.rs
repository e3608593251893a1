// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! cpuduel CLI
//!
//! Command-line interface for the cpuduel benchmark gateway.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};

use cpuduel_core::{Config, ConfigLoader, DuelResult, Mode, RawCpuQuery};

mod commands;

/// cpuduel - CPU timing of one workload on a stateless handler and a singleton actor
#[derive(Parser)]
#[command(name = "cpuduel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (built-in defaults when omitted)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Listen address, overrides server.listen
        #[arg(short, long)]
        listen: Option<SocketAddr>,
    },

    /// Run the CPU task once and print the envelope
    Run {
        /// Backend to run on: worker or durable-object
        #[arg(short, long, default_value = "worker")]
        mode: Mode,

        /// Number of items per workload
        #[arg(long)]
        items: Option<String>,

        /// Label length per item
        #[arg(long)]
        item_size: Option<String>,

        /// Number of loops
        #[arg(long)]
        loops: Option<String>,
    },

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        file: String,
    },
}

fn load_config(path: Option<&str>) -> DuelResult<Config> {
    match path {
        Some(path) => ConfigLoader::load_file(path),
        None => Ok(Config::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    // Dispatch to command handlers
    match cli.command {
        Commands::Serve { listen } => {
            let config = load_config(cli.config.as_deref())?;
            commands::serve::execute(config, listen).await
        }
        Commands::Run {
            mode,
            items,
            item_size,
            loops,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let raw = RawCpuQuery {
                items,
                item_size,
                loops,
            };
            commands::run::execute(&config, mode, raw).await
        }
        Commands::Validate { file } => commands::validate::execute(&file).await,
    }
}
