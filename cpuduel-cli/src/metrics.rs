// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Prometheus metrics for benchmark runs.
//!
//! Process-local counters only; nothing is persisted across restarts.

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, HistogramVec,
    IntCounterVec, IntGaugeVec,
};

lazy_static! {
    pub static ref RUNS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "cpuduel_runs_total",
        "Total number of benchmark runs by backend and outcome",
        &["mode", "outcome"]
    )
    .unwrap();
    pub static ref RUN_CPU_SECONDS: HistogramVec = register_histogram_vec!(
        "cpuduel_run_cpu_seconds",
        "Monotonic time spent inside the CPU task",
        &["mode"],
        vec![0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();
    pub static ref ACTOR_QUEUE_DEPTH: IntGaugeVec = register_int_gauge_vec!(
        "cpuduel_actor_queue_depth",
        "Requests waiting in an actor mailbox",
        &["actor"]
    )
    .unwrap();
}

/// Force registration so the families show up before the first run.
pub fn init() {
    lazy_static::initialize(&RUNS_TOTAL);
    lazy_static::initialize(&RUN_CPU_SECONDS);
    lazy_static::initialize(&ACTOR_QUEUE_DEPTH);
}

/// Record a finished run.
pub fn record_run(mode: &str, outcome: &str, elapsed_ms: Option<f64>) {
    RUNS_TOTAL.with_label_values(&[mode, outcome]).inc();
    if let Some(ms) = elapsed_ms {
        RUN_CPU_SECONDS
            .with_label_values(&[mode])
            .observe(ms / 1000.0);
    }
}

/// Render all registered metrics in the text exposition format.
pub fn render() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
    }

    String::from_utf8(buffer).unwrap_or_else(|_| String::from("Encoding error"))
}
