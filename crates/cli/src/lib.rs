// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! bhrs - command-line front end for the backhaul connectivity layer.
//!
//! Wires [`bh_core`] to a local SQLite store and an HTTP document store,
//! then exposes it as the `backhaul` CLI.
//!
//! # Main Components
//!
//! - [`Config`] - TOML configuration (data directory, monitor, retry and remote settings)
//! - [`Context`] - the sync engine and its collaborators for one invocation
//! - [`http`] - reqwest-backed reachability probe and document store
//! - [`Error`] - Error types for all operations
//!
//! ```rust,ignore
//! use bhrs::{Config, Context};
//!
//! let config = Config::load_resolved(None)?;
//! let ctx = Context::open(&config, false)?;
//! ctx.engine.save("drivers", "d1", serde_json::json!({"name": "A"})).await?;
//! ```

mod cli;
pub mod colors;
mod commands;
mod display;
mod env;

pub mod config;
pub mod context;
pub mod error;
pub mod http;

pub use cli::{Cli, Command, DocArgs, JsonArgs, QueueCommand};
pub use config::{Config, RemoteConfig};
pub use context::Context;
pub use error::{Error, Result};

use std::io::Write;

use bh_core::OperationType;

/// Load configuration, open the local store and run one command.
pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::load_resolved(cli.config.as_deref())?;
    let ctx = Context::open(&config, cli.offline)?;
    let color = colors::should_colorize();
    let mut out = std::io::stdout();
    dispatch(&ctx, cli.command, color, &mut out).await
}

/// Run a command against an already opened context.
pub async fn dispatch(
    ctx: &Context,
    command: Command,
    color: bool,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Status { output } => commands::status::run(ctx, output.json, color, out).await,
        Command::Get { doc } => commands::doc::get(ctx, &doc.collection, &doc.id, out).await,
        Command::Put { doc, document } => {
            commands::doc::write(
                ctx,
                OperationType::Update,
                &doc.collection,
                &doc.id,
                Some(&document),
                color,
                out,
            )
            .await
        }
        Command::Create { doc, document } => {
            commands::doc::write(
                ctx,
                OperationType::Create,
                &doc.collection,
                &doc.id,
                Some(&document),
                color,
                out,
            )
            .await
        }
        Command::Delete { doc } => {
            commands::doc::write(
                ctx,
                OperationType::Delete,
                &doc.collection,
                &doc.id,
                None,
                color,
                out,
            )
            .await
        }
        Command::Queue { command } => match command {
            QueueCommand::List { output } => {
                commands::queue::list(ctx, output.json, color, out).await
            }
            QueueCommand::Dead { output } => {
                commands::queue::dead(ctx, output.json, color, out).await
            }
            QueueCommand::ClearDead => commands::queue::clear_dead(ctx, out).await,
            QueueCommand::RequeueDead => commands::queue::requeue_dead(ctx, out).await,
        },
        Command::Sync { output } => commands::sync::run(ctx, output.json, color, out).await,
        Command::Watch => commands::watch::run(ctx, color, out).await,
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
