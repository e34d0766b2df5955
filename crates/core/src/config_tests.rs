// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    first = { 1, 1000 },
    second = { 2, 2000 },
    third = { 3, 4000 },
    fourth = { 4, 8000 },
)]
fn delay_doubles_per_retry(retry: u32, expected_ms: u64) {
    let policy = RetryPolicy::new(5, 1000);
    assert_eq!(policy.delay_for(retry), Duration::from_millis(expected_ms));
}

#[test]
fn delay_saturates_for_huge_retry_counts() {
    let policy = RetryPolicy::new(u32::MAX, 1000);
    assert_eq!(policy.delay_for(u32::MAX), Duration::from_millis(u64::MAX));
}

#[test]
fn defaults_match_documented_values() {
    let monitor = MonitorConfig::default();
    assert_eq!(monitor.probe_timeout(), Duration::from_secs(5));
    assert_eq!(monitor.check_interval(), Duration::from_secs(30));

    assert_eq!(ErrorConfig::default().dedup_window(), Duration::from_secs(60));
    assert_eq!(QueueConfig::default().max_attempts, 3);
    assert_eq!(RetryPolicy::default(), RetryPolicy::new(3, 1000));

    let sync = SyncConfig::default();
    assert_eq!(sync.write_retry.max_retries, 0);
    assert_eq!(sync.replay_retry, RetryPolicy::new(2, 1000));
}

#[test]
fn partial_sections_fill_defaults() {
    let monitor: MonitorConfig = serde_json::from_str(r#"{"probe_timeout_ms": 250}"#).unwrap();
    assert_eq!(monitor.probe_timeout_ms, 250);
    assert_eq!(monitor.check_interval_ms, 30_000);

    let sync: SyncConfig =
        serde_json::from_str(r#"{"replay_retry": {"max_retries": 5}}"#).unwrap();
    assert_eq!(sync.replay_retry, RetryPolicy::new(5, 1000));
    assert_eq!(sync.write_retry, RetryPolicy::none());
}

#[test]
fn zero_interval_is_clamped() {
    let monitor = MonitorConfig {
        check_interval_ms: 0,
        ..MonitorConfig::default()
    };
    assert_eq!(monitor.check_interval(), Duration::from_millis(1));
}
