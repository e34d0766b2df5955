// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::colors;

pub use args::{DocArgs, JsonArgs};

#[derive(Parser, Debug)]
#[command(name = "backhaul")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline-tolerant access to a remote document store")]
#[command(
    long_about = "Offline-tolerant access to a remote document store.\n\n\
    Writes made while the network is down are queued locally and replayed \
    once connectivity returns."
)]
#[command(styles = colors::styles())]
pub struct Cli {
    /// Config file (default: $BACKHAUL_CONFIG or the platform config dir)
    #[arg(long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Behave as if the device reported itself offline
    #[arg(long, global = true)]
    pub offline: bool,

    /// Log at info level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a connectivity check and print the network state
    Status {
        #[command(flatten)]
        output: JsonArgs,
    },

    /// Read a document (remote when reachable, else local cache)
    Get {
        #[command(flatten)]
        doc: DocArgs,
    },

    /// Write a document, queueing it if the remote is unreachable
    Put {
        #[command(flatten)]
        doc: DocArgs,

        /// Document body as JSON
        document: String,
    },

    /// Create a document, queueing it if the remote is unreachable
    Create {
        #[command(flatten)]
        doc: DocArgs,

        /// Document body as JSON
        document: String,
    },

    /// Delete a document, queueing it if the remote is unreachable
    Delete {
        #[command(flatten)]
        doc: DocArgs,
    },

    /// Inspect and manage the offline queue
    Queue {
        #[command(subcommand)]
        command: QueueCommand,
    },

    /// Check connectivity, then replay queued operations
    Sync {
        #[command(flatten)]
        output: JsonArgs,
    },

    /// Monitor connectivity and sync on reconnect until interrupted
    Watch,
}

#[derive(Subcommand, Debug)]
pub enum QueueCommand {
    /// List pending operations
    List {
        #[command(flatten)]
        output: JsonArgs,
    },

    /// List dead-lettered operations
    Dead {
        #[command(flatten)]
        output: JsonArgs,
    },

    /// Discard all dead-lettered operations
    ClearDead,

    /// Move dead-lettered operations back into the queue
    RequeueDead,
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
