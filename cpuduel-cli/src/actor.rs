// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Singleton actors addressed by logical name.
//!
//! Each actor is a single task that owns a mailbox and handles one request
//! at a time, so concurrent callers queue instead of racing. Instances are
//! created on first lookup and live as long as the namespace. The only thing
//! shared between calls is the name-to-mailbox binding; actors keep no data.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{Request, Response},
    response::IntoResponse,
    routing::get,
    Router,
};
use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot};
use tower::ServiceExt;

use cpuduel_core::{ActorName, Mode, RawCpuQuery, TaskRunner};

use crate::dispatch::run_task;
use crate::envelope::{DispatchError, DispatchOutcome};
use crate::metrics;

/// A request waiting in an actor mailbox.
struct ActorMessage {
    request: Request<Body>,
    reply: oneshot::Sender<Response<Body>>,
}

/// Handle used to send requests to one actor instance.
#[derive(Debug, Clone)]
pub struct ActorStub {
    name: ActorName,
    mailbox: mpsc::Sender<ActorMessage>,
}

impl ActorStub {
    /// Send a request and wait for the actor's response.
    ///
    /// Waits for mailbox space when the actor is backed up. The queue depth
    /// gauge only counts a request once it holds a mailbox slot.
    pub async fn fetch(&self, request: Request<Body>) -> Result<Response<Body>, DispatchError> {
        let permit = self
            .mailbox
            .reserve()
            .await
            .map_err(|_| self.relay_error("actor mailbox is closed"))?;

        let (reply, response) = oneshot::channel();
        metrics::ACTOR_QUEUE_DEPTH
            .with_label_values(&[self.name.as_str()])
            .inc();
        permit.send(ActorMessage { request, reply });

        response
            .await
            .map_err(|_| self.relay_error("actor dropped the reply"))
    }

    fn relay_error(&self, reason: &str) -> DispatchError {
        DispatchError::Relay {
            actor: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Name-addressed registry of singleton actors.
#[derive(Debug)]
pub struct ActorNamespace {
    instances: DashMap<ActorName, ActorStub>,
    runner: TaskRunner,
    mailbox_capacity: usize,
}

impl ActorNamespace {
    /// Create an empty namespace. No actor exists until the first lookup.
    pub fn new(runner: TaskRunner, mailbox_capacity: usize) -> Self {
        Self {
            instances: DashMap::new(),
            runner,
            mailbox_capacity: mailbox_capacity.max(1),
        }
    }

    /// Get the stub for `name`, spawning the actor on first reference.
    ///
    /// An actor whose task has exited is replaced by a fresh instance under
    /// the same name. Must be called from within a Tokio runtime.
    pub fn get(&self, name: &ActorName) -> ActorStub {
        let mut entry = self
            .instances
            .entry(name.clone())
            .or_insert_with(|| self.spawn(name.clone()));

        if entry.mailbox.is_closed() {
            tracing::warn!(actor = %name, "Actor mailbox closed, respawning");
            *entry = self.spawn(name.clone());
        }

        entry.value().clone()
    }

    /// Check if an actor has been created for `name`.
    pub fn contains(&self, name: &ActorName) -> bool {
        self.instances.contains_key(name)
    }

    /// Number of actors created so far.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Check if no actor has been created yet.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Bind `name` to an actor that answers every request with `handler`.
    /// A `None` from the handler drops the reply.
    #[cfg(test)]
    pub(crate) fn bind_handler<F>(&self, name: ActorName, handler: F)
    where
        F: Fn(Request<Body>) -> Option<Response<Body>> + Send + 'static,
    {
        let (mailbox, mut inbox) = mpsc::channel::<ActorMessage>(self.mailbox_capacity);
        let depth = metrics::ACTOR_QUEUE_DEPTH.with_label_values(&[name.as_str()]);

        tokio::spawn(async move {
            while let Some(message) = inbox.recv().await {
                depth.dec();
                if let Some(response) = handler(message.request) {
                    let _ = message.reply.send(response);
                }
            }
        });

        self.instances.insert(name.clone(), ActorStub { name, mailbox });
    }

    fn spawn(&self, name: ActorName) -> ActorStub {
        let (mailbox, inbox) = mpsc::channel(self.mailbox_capacity);
        let app = actor_router(self.runner);

        tracing::info!(actor = %name, capacity = self.mailbox_capacity, "Creating actor instance");
        tokio::spawn(run_actor(name.clone(), inbox, app));

        ActorStub { name, mailbox }
    }
}

/// Routes served by every actor instance.
fn actor_router(runner: TaskRunner) -> Router {
    Router::new().route("/cpu", get(actor_cpu)).with_state(runner)
}

/// Actor message loop. The next message is not received until the current
/// one has been fully handled.
async fn run_actor(name: ActorName, mut inbox: mpsc::Receiver<ActorMessage>, app: Router) {
    let depth = metrics::ACTOR_QUEUE_DEPTH.with_label_values(&[name.as_str()]);

    while let Some(message) = inbox.recv().await {
        depth.dec();
        tracing::debug!(actor = %name, uri = %message.request.uri(), "Actor handling request");

        let response = match app.clone().oneshot(message.request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };

        if message.reply.send(response).is_err() {
            tracing::debug!(actor = %name, "Caller went away before the actor replied");
        }
    }

    tracing::info!(actor = %name, "Actor mailbox closed");
}

/// `GET /cpu` inside the actor. Resolves its own parameters from the query.
async fn actor_cpu(
    State(runner): State<TaskRunner>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    let raw = RawCpuQuery::from_pairs(pairs);
    let result = run_task(Mode::DurableObject, runner, raw).await;
    DispatchOutcome::from_result(Mode::DurableObject, result)
}
