// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Dispatcher routing a benchmark request to one of the two backends.
//!
//! - Direct backend: resolve and run in the context of the inbound request.
//! - Actor backend: resolve, then forward a synthetic `GET http://do/cpu`
//!   to the singleton actor and relay its status and body unmodified.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
};

use cpuduel_core::{ActorName, Config, CpuParams, Mode, RawCpuQuery, RunReport, TaskError, TaskRunner};

use crate::actor::ActorNamespace;
use crate::envelope::{DispatchError, DispatchOutcome};
use crate::metrics;

/// Host used for the internal actor request.
const ACTOR_HOST: &str = "http://do";

/// Resolve and run on the blocking pool.
///
/// A panic in the task becomes `TaskError::Aborted`. Dropping the returned
/// future does not stop the computation.
pub async fn run_task(
    mode: Mode,
    runner: TaskRunner,
    raw: RawCpuQuery,
) -> Result<RunReport, DispatchError> {
    let joined = tokio::task::spawn_blocking(move || {
        let params = raw.resolve();
        runner.run(params)
    })
    .await;

    let result = match joined {
        Ok(result) => result,
        Err(e) => Err(TaskError::Aborted {
            reason: e.to_string(),
        }),
    };

    match &result {
        Ok(report) => {
            metrics::record_run(mode.as_str(), "success", Some(report.elapsed_ms));
            tracing::info!(
                mode = %mode,
                items = report.params.items,
                item_size = report.params.item_size,
                loops = report.params.loops,
                elapsed_ms = report.elapsed_ms,
                checksum = report.checksum,
                "Run completed"
            );
        }
        Err(e) => {
            metrics::record_run(mode.as_str(), "error", None);
            tracing::error!(mode = %mode, error = %e, "Run failed");
        }
    }

    result.map_err(DispatchError::from)
}

/// Routes requests to the direct or actor backend.
#[derive(Clone)]
pub struct Dispatcher {
    runner: TaskRunner,
    actors: Arc<ActorNamespace>,
    actor_name: ActorName,
}

impl Dispatcher {
    /// Build a dispatcher with its own actor namespace.
    pub fn new(config: &Config) -> Self {
        let runner = config.runner.task_runner();
        let actors = Arc::new(ActorNamespace::new(runner, config.actor.mailbox_capacity));
        Self::with_namespace(runner, actors, config.actor.name.clone())
    }

    /// Build a dispatcher over an existing actor namespace.
    pub fn with_namespace(
        runner: TaskRunner,
        actors: Arc<ActorNamespace>,
        actor_name: ActorName,
    ) -> Self {
        Self {
            runner,
            actors,
            actor_name,
        }
    }

    /// Actor namespace used by the actor backend.
    pub fn actors(&self) -> &Arc<ActorNamespace> {
        &self.actors
    }

    /// Dispatch to the backend selected by `mode`.
    pub async fn dispatch(&self, mode: Mode, raw: RawCpuQuery) -> DispatchOutcome {
        match mode {
            Mode::Worker => self.dispatch_direct(raw).await,
            Mode::DurableObject => self.dispatch_actor(raw).await,
        }
    }

    /// Direct backend.
    pub async fn dispatch_direct(&self, raw: RawCpuQuery) -> DispatchOutcome {
        let result = run_task(Mode::Worker, self.runner, raw).await;
        DispatchOutcome::from_result(Mode::Worker, result)
    }

    /// Actor backend.
    ///
    /// Errors produced inside the actor come back as the actor's own envelope
    /// and are relayed as-is. Only failures to reach the actor or to read its
    /// reply are wrapped here.
    pub async fn dispatch_actor(&self, raw: RawCpuQuery) -> DispatchOutcome {
        let params = raw.resolve();
        match self.relay(params).await {
            Ok(outcome) => outcome,
            Err(e) => {
                metrics::record_run(Mode::DurableObject.as_str(), e.outcome(), None);
                tracing::error!(actor = %self.actor_name, error = %e, "Actor relay failed");
                DispatchOutcome::failure(Mode::DurableObject, &e)
            }
        }
    }

    async fn relay(&self, params: CpuParams) -> Result<DispatchOutcome, DispatchError> {
        let relay_error = |reason: String| DispatchError::Relay {
            actor: self.actor_name.clone(),
            reason,
        };

        let request = Request::builder()
            .method(Method::GET)
            .uri(format!("{}/cpu?{}", ACTOR_HOST, params.to_query_string()))
            .body(Body::empty())
            .map_err(|e| relay_error(e.to_string()))?;

        let stub = self.actors.get(&self.actor_name);
        let response = stub.fetch(request).await?;

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| relay_error(format!("reading actor body: {}", e)))?;
        let body: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| relay_error(format!("actor body is not JSON: {}", e)))?;

        Ok(DispatchOutcome { status, body })
    }
}
