// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use serde::Serialize;

use bh_core::NetworkState;

use crate::context::Context;
use crate::display::format_state;
use crate::error::Result;

use super::write_json;

#[derive(Serialize)]
struct StatusReport {
    #[serde(flatten)]
    state: NetworkState,
    platform_online: bool,
    pending: usize,
    dead_letters: usize,
}

/// Run a forced connectivity check and report the result with queue sizes.
pub async fn run(ctx: &Context, json: bool, color: bool, out: &mut impl Write) -> Result<()> {
    let state = ctx.monitor.check_connectivity(true).await;
    let report = StatusReport {
        state,
        platform_online: ctx.monitor.platform_online(),
        pending: ctx.engine.queue().len().await?,
        dead_letters: ctx.engine.queue().dead_letters().await?.len(),
    };

    if json {
        return write_json(out, &report);
    }

    writeln!(out, "{}", format_state(&report.state, color))?;
    writeln!(out, "pending:  {}", report.pending)?;
    if report.dead_letters > 0 {
        writeln!(out, "dead:     {}", report.dead_letters)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
