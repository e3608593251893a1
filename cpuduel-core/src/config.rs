// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML configuration parser with strict schema validation.
//!
//! Operator configuration is validated at boot-up time. Any invalid field
//! results in a HardValidationError that prevents startup. Request
//! parameters are not configuration and are never rejected.

use std::net::{AddrParseError, SocketAddr};
use std::path::Path;

use serde::Deserialize;

use crate::error::{DuelError, DuelResult, HardValidationError};
use crate::runner::{TaskRunner, DEFAULT_PAYLOAD_BUDGET_BYTES};
use crate::types::{ActorName, DEFAULT_ACTOR_NAME};

/// Raw HTTP server configuration.
#[derive(Debug, Deserialize)]
struct RawServerConfig {
    #[serde(default = "default_listen")]
    listen: String,
    #[serde(default = "default_service_name")]
    service_name: String,
}

fn default_listen() -> String {
    "0.0.0.0:8787".to_string()
}

fn default_service_name() -> String {
    "cpuduel".to_string()
}

impl Default for RawServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            service_name: default_service_name(),
        }
    }
}

/// Raw actor configuration.
#[derive(Debug, Deserialize)]
struct RawActorConfig {
    #[serde(default = "default_actor_name")]
    name: String,
    #[serde(default = "default_mailbox_capacity")]
    mailbox_capacity: usize,
}

fn default_actor_name() -> String {
    DEFAULT_ACTOR_NAME.to_string()
}

fn default_mailbox_capacity() -> usize {
    64
}

impl Default for RawActorConfig {
    fn default() -> Self {
        Self {
            name: default_actor_name(),
            mailbox_capacity: default_mailbox_capacity(),
        }
    }
}

/// Raw runner configuration.
#[derive(Debug, Deserialize)]
struct RawRunnerConfig {
    #[serde(default = "default_payload_budget_mb")]
    payload_budget_mb: u64,
}

fn default_payload_budget_mb() -> u64 {
    1024 // 1 GiB admits the maximum parameters
}

impl Default for RawRunnerConfig {
    fn default() -> Self {
        Self {
            payload_budget_mb: default_payload_budget_mb(),
        }
    }
}

/// Raw root configuration file.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    server: RawServerConfig,
    #[serde(default)]
    actor: RawActorConfig,
    #[serde(default)]
    runner: RawRunnerConfig,
}

/// Validated HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub service_name: String,
}

/// Validated actor configuration.
#[derive(Debug, Clone)]
pub struct ActorConfig {
    pub name: ActorName,
    pub mailbox_capacity: usize,
}

/// Validated runner configuration.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub payload_budget_bytes: u64,
}

impl RunnerConfig {
    /// Build the task runner this configuration describes.
    pub fn task_runner(&self) -> TaskRunner {
        TaskRunner::new(self.payload_budget_bytes)
    }
}

/// Complete validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub actor: ActorConfig,
    pub runner: RunnerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                listen: SocketAddr::from(([0, 0, 0, 0], 8787)),
                service_name: default_service_name(),
            },
            actor: ActorConfig {
                name: ActorName::default(),
                mailbox_capacity: default_mailbox_capacity(),
            },
            runner: RunnerConfig {
                payload_budget_bytes: DEFAULT_PAYLOAD_BUDGET_BYTES,
            },
        }
    }
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> DuelResult<Config> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DuelError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| DuelError::Io {
            context: "reading config file",
            source: e,
        })?;

        Self::load_string(&content)
    }

    /// Load and validate configuration from a YAML string.
    ///
    /// An empty document yields the defaults.
    pub fn load_string(content: &str) -> DuelResult<Config> {
        if content.trim().is_empty() {
            return Self::validate(RawConfig::default());
        }

        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| DuelError::ConfigParse {
                message: format!("YAML parse error: {}", e),
            })?;

        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> DuelResult<Config> {
        Ok(Config {
            server: Self::validate_server(raw.server)?,
            actor: Self::validate_actor(raw.actor)?,
            runner: Self::validate_runner(raw.runner)?,
        })
    }

    fn validate_server(raw: RawServerConfig) -> DuelResult<ServerConfig> {
        let listen: SocketAddr =
            raw.listen
                .parse()
                .map_err(|e: AddrParseError| HardValidationError::InvalidFieldValue {
                    field: "server.listen",
                    value: raw.listen.clone(),
                    reason: e.to_string(),
                })?;

        if raw.service_name.trim().is_empty() {
            return Err(HardValidationError::InvalidFieldValue {
                field: "server.service_name",
                value: raw.service_name,
                reason: "Service name cannot be empty".to_string(),
            }
            .into());
        }

        Ok(ServerConfig {
            listen,
            service_name: raw.service_name,
        })
    }

    fn validate_actor(raw: RawActorConfig) -> DuelResult<ActorConfig> {
        const MAX_MAILBOX: usize = 10_000;

        let name = ActorName::new(raw.name)?;

        if raw.mailbox_capacity == 0 || raw.mailbox_capacity > MAX_MAILBOX {
            return Err(HardValidationError::OutOfBounds {
                field: "actor.mailbox_capacity",
                value: raw.mailbox_capacity as u64,
                min: 1,
                max: MAX_MAILBOX as u64,
            }
            .into());
        }

        Ok(ActorConfig {
            name,
            mailbox_capacity: raw.mailbox_capacity,
        })
    }

    fn validate_runner(raw: RawRunnerConfig) -> DuelResult<RunnerConfig> {
        // 1 MB .. 16 GB
        const MAX_BUDGET_MB: u64 = 16 * 1024;

        if raw.payload_budget_mb == 0 || raw.payload_budget_mb > MAX_BUDGET_MB {
            return Err(HardValidationError::OutOfBounds {
                field: "runner.payload_budget_mb",
                value: raw.payload_budget_mb,
                min: 1,
                max: MAX_BUDGET_MB,
            }
            .into());
        }

        Ok(RunnerConfig {
            payload_budget_bytes: raw.payload_budget_mb * 1024 * 1024,
        })
    }
}
