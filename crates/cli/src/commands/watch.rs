// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::future::Future;
use std::io::Write;

use bh_core::{NetworkStatus, Quality};
use chrono::Utc;
use tokio::sync::mpsc;

use crate::colors;
use crate::context::Context;
use crate::display::format_state_line;
use crate::error::Result;

/// Monitor connectivity and sync on reconnect until Ctrl-C.
pub async fn run(ctx: &Context, color: bool, out: &mut impl Write) -> Result<()> {
    run_until(
        ctx,
        async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "cannot listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        },
        color,
        out,
    )
    .await
}

/// Print one line per settled state change until `shutdown` resolves.
pub async fn run_until(
    ctx: &Context,
    shutdown: impl Future<Output = ()>,
    color: bool,
    out: &mut impl Write,
) -> Result<()> {
    let (tx, mut states) = mpsc::unbounded_channel();
    let subscription = ctx.monitor.subscribe(move |state| {
        let _ = tx.send(state.clone());
    });
    let monitoring = ctx.monitor.start_monitoring();
    let auto_sync = ctx.engine.spawn_auto_sync();

    let pending = ctx.engine.queue().len().await?;
    writeln!(
        out,
        "{}",
        colors::context(&format!("watching ({pending} pending)"), color)
    )?;

    tokio::pin!(shutdown);
    let mut last: Option<(NetworkStatus, Quality)> = None;
    let result = loop {
        let state = tokio::select! {
            _ = &mut shutdown => break Ok(()),
            state = states.recv() => match state {
                Some(state) => state,
                None => break Ok(()),
            },
        };
        if state.status == NetworkStatus::Checking {
            continue;
        }
        let key = (state.status, state.quality);
        if last == Some(key) {
            continue;
        }
        last = Some(key);

        let at = Utc::now().format("%H:%M:%S").to_string();
        if let Err(e) = writeln!(
            out,
            "{} {}",
            colors::context(&at, color),
            format_state_line(&state, color)
        ) {
            break Err(e.into());
        }
    };

    auto_sync.stop();
    monitoring.stop();
    subscription.unsubscribe();
    result
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
