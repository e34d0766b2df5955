// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Text rendering for command output.

use bh_core::{DrainSummary, NetworkState, OperationType, PendingOperation, WriteOutcome};

use crate::colors;

/// Timestamp format used in text output.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn reachable(flag: bool) -> &'static str {
    if flag {
        "reachable"
    } else {
        "unreachable"
    }
}

/// Multi-line report of a network state.
pub fn format_state(state: &NetworkState, color: bool) -> String {
    let latency = state
        .latency_ms
        .map(|ms| format!("{ms}ms"))
        .unwrap_or_else(|| "-".to_string());
    let checked = state
        .last_checked_at
        .map(|at| at.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| "never".to_string());

    [
        format!("status:   {}", colors::status(state.status, color)),
        format!("quality:  {}", colors::quality(state.quality, color)),
        format!("latency:  {latency}"),
        format!("primary:  {}", reachable(state.is_primary_reachable)),
        format!("internet: {}", reachable(state.is_generic_internet_reachable)),
        format!("checked:  {}", colors::context(&checked, color)),
    ]
    .join("\n")
}

/// One-line state used when streaming changes.
pub fn format_state_line(state: &NetworkState, color: bool) -> String {
    let mut line = colors::status(state.status, color);
    if state.is_online() {
        line.push_str(&format!(" ({}", colors::quality(state.quality, color)));
        if let Some(ms) = state.latency_ms {
            line.push_str(&format!(", {ms}ms"));
        }
        line.push(')');
    }
    line
}

/// One queued operation: `#id op collection/id attempts=n enqueued`.
pub fn format_operation(op: &PendingOperation, color: bool) -> String {
    let enqueued = op.enqueued_at.format(TIME_FORMAT).to_string();
    format!(
        "#{:<4} {:<6} {}/{} attempts={} {}",
        op.id,
        op.operation_type,
        op.collection_path,
        op.document_id,
        op.attempts,
        colors::context(&enqueued, color)
    )
}

/// A list of operations, or `empty` when there are none.
pub fn format_operations(ops: &[PendingOperation], empty: &str, color: bool) -> String {
    if ops.is_empty() {
        return empty.to_string();
    }
    ops.iter()
        .map(|op| format_operation(op, color))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_summary(summary: &DrainSummary) -> String {
    let mut line = format!("synced {}, failed {}", summary.success, summary.failed);
    if summary.abandoned > 0 {
        line.push_str(&format!(" ({} moved to dead letters)", summary.abandoned));
    }
    line
}

/// Result of a write, e.g. `queued update drivers/d1`.
pub fn format_outcome(
    outcome: WriteOutcome,
    kind: OperationType,
    collection: &str,
    id: &str,
    color: bool,
) -> String {
    let line = format!("{outcome} {kind} {collection}/{id}");
    match outcome {
        WriteOutcome::Applied => line,
        WriteOutcome::Queued => format!(
            "{line} {}",
            colors::context("(will sync when online)", color)
        ),
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
