// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Workload generation and task runner microbenchmarks.
//!
//! Gives an in-process baseline for the per-loop cost that the HTTP
//! backends report.

use cpuduel_core::{CpuParams, TaskRunner, Workload};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

/// Item sizes to benchmark (in bytes of label text).
const ITEM_SIZES: &[u32] = &[16, 256, 2048];

/// Items per workload for the generation benchmarks.
const ITEMS: u32 = 1000;

/// Benchmark workload generation plus serialization for one loop.
fn bench_generate_and_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_serialize");
    group.measurement_time(Duration::from_secs(5));

    for &size in ITEM_SIZES {
        group.throughput(Throughput::Bytes(ITEMS as u64 * size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let workload = Workload::generate(black_box(ITEMS), black_box(size), 0);
                black_box(workload.to_json().map(|json| json.len()).ok());
            });
        });
    }

    group.finish();
}

/// Benchmark a full run with the default parameters.
fn bench_runner_defaults(c: &mut Criterion) {
    let mut group = c.benchmark_group("runner");
    group.sample_size(10);

    let runner = TaskRunner::default();
    group.bench_function("defaults", |b| {
        b.iter(|| black_box(runner.run(black_box(CpuParams::DEFAULT)).ok()));
    });

    group.finish();
}

criterion_group!(benches, bench_generate_and_serialize, bench_runner_defaults);
criterion_main!(benches);
