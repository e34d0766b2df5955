// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use bh_core::{DrainSummary, NetworkStatus};
use serde::Serialize;

use crate::colors;
use crate::context::Context;
use crate::display::format_summary;
use crate::error::Result;

use super::write_json;

#[derive(Serialize)]
struct SyncReport {
    status: NetworkStatus,
    /// Absent when the sync was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<DrainSummary>,
    pending: usize,
}

/// Check connectivity, then replay the queue if online.
pub async fn run(ctx: &Context, json: bool, color: bool, out: &mut impl Write) -> Result<()> {
    let state = ctx.monitor.check_connectivity(true).await;
    let summary = if state.is_online() {
        Some(ctx.engine.sync_pending().await?)
    } else {
        None
    };
    let report = SyncReport {
        status: state.status,
        summary,
        pending: ctx.engine.queue().len().await?,
    };

    if json {
        return write_json(out, &report);
    }

    match &report.summary {
        Some(summary) => writeln!(out, "{}", format_summary(summary))?,
        None => writeln!(
            out,
            "{}, not syncing",
            colors::status(report.status, color)
        )?,
    }
    if report.pending > 0 {
        writeln!(
            out,
            "{}",
            colors::context(&format!("{} operation(s) still pending", report.pending), color)
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
