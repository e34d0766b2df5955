// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use crate::context::Context;
use crate::display::format_operations;
use crate::error::Result;

use super::write_json;

/// List pending operations in replay order.
pub async fn list(ctx: &Context, json: bool, color: bool, out: &mut impl Write) -> Result<()> {
    let pending = ctx.engine.queue().pending().await?;
    if json {
        return write_json(out, &pending);
    }
    writeln!(out, "{}", format_operations(&pending, "queue is empty", color))?;
    Ok(())
}

/// List operations abandoned after too many failed replays.
pub async fn dead(ctx: &Context, json: bool, color: bool, out: &mut impl Write) -> Result<()> {
    let dead = ctx.engine.queue().dead_letters().await?;
    if json {
        return write_json(out, &dead);
    }
    writeln!(out, "{}", format_operations(&dead, "no dead letters", color))?;
    Ok(())
}

pub async fn clear_dead(ctx: &Context, out: &mut impl Write) -> Result<()> {
    let cleared = ctx.engine.queue().clear_dead_letters().await?;
    writeln!(out, "cleared {cleared} dead letter(s)")?;
    Ok(())
}

pub async fn requeue_dead(ctx: &Context, out: &mut impl Write) -> Result<()> {
    let moved = ctx.engine.queue().requeue_dead_letters().await?;
    writeln!(out, "requeued {moved} operation(s)")?;
    Ok(())
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
