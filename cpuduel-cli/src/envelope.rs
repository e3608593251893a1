// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Response envelopes shared by both backends.
//!
//! Every benchmark response is JSON, carries the `mode` tag and is sent with
//! `Cache-Control: no-store`.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cpuduel_core::{ActorName, Mode, RunReport, TaskError};

/// Successful run, tagged with the backend that hosted it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEnvelope {
    pub mode: Mode,
    #[serde(flatten)]
    pub report: RunReport,
}

/// Error kinds that get their own tag on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    RelayError,
}

/// Failed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub mode: Mode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

/// Errors a backend can hand back to the dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Task(#[from] TaskError),

    #[error("Relay to actor '{actor}' failed: {reason}")]
    Relay { actor: ActorName, reason: String },
}

impl DispatchError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Relay { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Wire tag, if this error has one.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Task(_) => None,
            Self::Relay { .. } => Some(ErrorKind::RelayError),
        }
    }

    /// Metric outcome label.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Task(_) => "error",
            Self::Relay { .. } => "relay_error",
        }
    }
}

/// Normalized result of a dispatch: status plus JSON body.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl DispatchOutcome {
    /// Envelope for a finished run.
    pub fn success(mode: Mode, report: RunReport) -> Self {
        Self::encode(StatusCode::OK, &RunEnvelope { mode, report })
    }

    /// Envelope for a failed run.
    pub fn failure(mode: Mode, err: &DispatchError) -> Self {
        Self::encode(
            err.status(),
            &ErrorEnvelope {
                mode,
                error: err.to_string(),
                kind: err.kind(),
            },
        )
    }

    /// Wrap a result from either backend.
    pub fn from_result(mode: Mode, result: Result<RunReport, DispatchError>) -> Self {
        match result {
            Ok(report) => Self::success(mode, report),
            Err(err) => Self::failure(mode, &err),
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    fn encode<T: Serialize>(status: StatusCode, envelope: &T) -> Self {
        match serde_json::to_value(envelope) {
            Ok(body) => Self { status, body },
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode envelope");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: serde_json::json!({ "error": e.to_string() }),
                }
            }
        }
    }
}

impl IntoResponse for DispatchOutcome {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CACHE_CONTROL, "no-store")],
            Json(self.body),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpuduel_core::{CpuParams, TaskRunner};

    #[test]
    fn test_success_envelope_is_flat() {
        let report = TaskRunner::default()
            .run(CpuParams::resolve(2.0, 2.0, 1.0))
            .unwrap();
        let outcome = DispatchOutcome::success(Mode::Worker, report.clone());

        assert_eq!(outcome.status, StatusCode::OK);
        assert_eq!(outcome.body["mode"], "worker");
        assert_eq!(outcome.body["checksum"], report.checksum);
        assert_eq!(outcome.body["params"]["itemSize"], 2);
        assert!(outcome.body.get("report").is_none());
    }

    #[test]
    fn test_task_error_envelope() {
        let err = DispatchError::from(TaskError::Aborted {
            reason: "boom".to_string(),
        });
        let outcome = DispatchOutcome::failure(Mode::DurableObject, &err);

        assert_eq!(outcome.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(outcome.body["mode"], "durable-object");
        assert!(outcome.body["error"].as_str().unwrap().contains("boom"));
        assert!(outcome.body.get("kind").is_none());
    }

    #[test]
    fn test_relay_error_envelope() {
        let err = DispatchError::Relay {
            actor: ActorName::default(),
            reason: "mailbox closed".to_string(),
        };
        let outcome = DispatchOutcome::failure(Mode::DurableObject, &err);

        assert_eq!(outcome.status, StatusCode::BAD_GATEWAY);
        assert_eq!(outcome.body["kind"], "relay_error");
        assert_eq!(err.outcome(), "relay_error");
    }

    #[test]
    fn test_response_sets_no_store() {
        let err = DispatchError::from(TaskError::Aborted {
            reason: "x".to_string(),
        });
        let response = DispatchOutcome::failure(Mode::Worker, &err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
    }
}
