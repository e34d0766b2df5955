// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors surfaced by the backhaul CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid JSON for {arg}: {reason}\n  hint: quote the document, e.g. '{{\"name\": \"A\"}}'")]
    InvalidJson { arg: &'static str, reason: String },

    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("http client error: {0}")]
    Http(String),

    #[error(transparent)]
    Core(#[from] bh_core::Error),

    #[error("remote error: {0}")]
    Remote(#[from] bh_core::RemoteError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
