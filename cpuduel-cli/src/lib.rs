// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! cpuduel server components.
//!
//! Actor namespace, dispatcher, response envelopes, HTTP gateway and
//! metrics. The `cpuduel` binary wires these together.

pub mod actor;
pub mod dispatch;
pub mod envelope;
pub mod gateway;
pub mod metrics;

pub use actor::{ActorNamespace, ActorStub};
pub use dispatch::Dispatcher;
pub use envelope::{DispatchError, DispatchOutcome, ErrorEnvelope, RunEnvelope};
pub use gateway::{router, start_gateway, GatewayState};
