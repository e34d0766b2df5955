// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use bh_core::{NetworkStatus, Quality};
use chrono::{TimeZone, Utc};
use serde_json::json;

use super::*;

fn operation(id: u64, kind: OperationType, attempts: u32) -> PendingOperation {
    PendingOperation {
        id,
        operation_type: kind,
        collection_path: "drivers".to_string(),
        document_id: "d1".to_string(),
        payload: Some(json!({"name": "A"})),
        attempts,
        enqueued_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
    }
}

#[test]
fn test_format_state_online() {
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
    let state = NetworkState::from_probes(true, true, 120, at);

    let text = format_state(&state, false);

    assert_eq!(
        text,
        "status:   online\n\
         quality:  good\n\
         latency:  120ms\n\
         primary:  reachable\n\
         internet: reachable\n\
         checked:  2026-03-01 09:30:00"
    );
}

#[test]
fn test_format_state_before_any_check() {
    let text = format_state(&NetworkState::initial(false), false);

    assert!(text.contains("status:   offline"));
    assert!(text.contains("quality:  unknown"));
    assert!(text.contains("latency:  -"));
    assert!(text.contains("checked:  never"));
}

#[test]
fn test_format_state_line() {
    let at = Utc::now();
    assert_eq!(
        format_state_line(&NetworkState::from_probes(true, true, 600, at), false),
        "online (poor, 600ms)"
    );
    assert_eq!(
        format_state_line(&NetworkState::from_probes(false, true, 30, at), false),
        "limited"
    );
    let checking = NetworkState::initial(true).checking();
    assert_eq!(checking.status, NetworkStatus::Checking);
    assert_eq!(format_state_line(&checking, false), "checking");
}

#[test]
fn test_format_state_line_colored() {
    let state = NetworkState::from_probes(true, true, 10, Utc::now());
    let line = format_state_line(&state, true);

    assert!(line.contains("\x1b[38;5;"));
    assert!(line.contains(Quality::Good.as_str()));
}

#[test]
fn test_format_operation() {
    let line = format_operation(&operation(7, OperationType::Update, 2), false);

    assert_eq!(line, "#7    update drivers/d1 attempts=2 2026-03-01 09:30:00");
}

#[test]
fn test_format_operations_empty() {
    assert_eq!(format_operations(&[], "queue is empty", false), "queue is empty");
}

#[test]
fn test_format_operations_one_per_line() {
    let ops = vec![
        operation(0, OperationType::Create, 0),
        operation(1, OperationType::Delete, 1),
    ];

    let text = format_operations(&ops, "queue is empty", false);

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("#0    create"));
    assert!(lines[1].starts_with("#1    delete"));
}

#[test]
fn test_format_summary() {
    let clean = DrainSummary {
        success: 3,
        failed: 0,
        abandoned: 0,
    };
    let lossy = DrainSummary {
        success: 1,
        failed: 2,
        abandoned: 1,
    };

    assert_eq!(format_summary(&clean), "synced 3, failed 0");
    assert_eq!(
        format_summary(&lossy),
        "synced 1, failed 2 (1 moved to dead letters)"
    );
}

#[test]
fn test_format_outcome() {
    assert_eq!(
        format_outcome(
            WriteOutcome::Applied,
            OperationType::Update,
            "drivers",
            "d1",
            false
        ),
        "applied update drivers/d1"
    );
    assert_eq!(
        format_outcome(
            WriteOutcome::Queued,
            OperationType::Delete,
            "drivers",
            "d1",
            false
        ),
        "queued delete drivers/d1 (will sync when online)"
    );
}
