// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.

use clap::Args;

/// Identifies a remote document.
#[derive(Args, Clone, Debug)]
pub struct DocArgs {
    /// Collection path (may nest, e.g. drivers/d1/trips)
    pub collection: String,

    /// Document id
    pub id: String,
}

/// Output format selection.
#[derive(Args, Clone, Debug, Default)]
pub struct JsonArgs {
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}
