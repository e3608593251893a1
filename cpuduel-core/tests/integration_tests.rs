// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Integration tests for cpuduel-core.
//!
//! Exercise the resolver, runner and config loader together.

use tempfile::TempDir;

use cpuduel_core::{ConfigLoader, CpuParams, DuelError, RawCpuQuery, TaskError, Workload};

/// Test configuration loading from a file
#[test]
fn test_config_loading_from_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("cpuduel.yaml");

    std::fs::write(
        &config_path,
        r#"
server:
  listen: 127.0.0.1:18787
actor:
  mailbox_capacity: 2
runner:
  payload_budget_mb: 1
"#,
    )
    .expect("Failed to write config");

    let config = ConfigLoader::load_file(&config_path).expect("Config should load");
    assert_eq!(config.server.listen.port(), 18787);
    assert_eq!(config.actor.mailbox_capacity, 2);

    // A 1 MiB budget rejects the maximum parameters before running
    let err = config.runner.task_runner().run(CpuParams::MAX).unwrap_err();
    assert!(matches!(err, TaskError::PayloadBudgetExceeded { .. }));
}

/// Test a missing config file is reported as such
#[test]
fn test_missing_config_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let err = ConfigLoader::load_file(temp_dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, DuelError::ConfigNotFound { .. }));
}

/// Test resolve → run from raw query text
#[test]
fn test_query_to_report() {
    let raw = RawCpuQuery::from_pairs(vec![
        ("items", " 64 "),
        ("itemSize", "0x10"),
        ("loops", "2.9"),
    ]);
    let params = raw.resolve();
    assert_eq!((params.items, params.item_size, params.loops), (64, 16, 2));

    let config = ConfigLoader::load_string("").unwrap();
    let report = config.runner.task_runner().run(params).unwrap();

    let mut expected = 0i32;
    for seed in 0..2u32 {
        let len = Workload::generate(64, 16, seed).to_json().unwrap().len();
        expected ^= (len as u32 + seed) as i32;
    }
    assert_eq!(report.checksum, expected);
    assert_eq!(report.params, params);
}

/// Test that different seeds change the payload but not its length
#[test]
fn test_seed_changes_content_not_length() {
    let a = Workload::generate(10, 5, 0).to_json().unwrap();
    let b = Workload::generate(10, 5, 1).to_json().unwrap();
    assert_ne!(a, b);
    assert_eq!(a.len(), b.len());
}
