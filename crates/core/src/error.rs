// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for bh-core operations.

use thiserror::Error;

use crate::classify::Category;

/// All possible errors raised by the local side of the resilience layer.
///
/// Remote failures have their own type, [`RemoteError`](crate::RemoteError),
/// because they carry a category and are routed through the queue instead
/// of being returned to callers.
#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data under key '{key}': {reason}")]
    CorruptedData { key: String, reason: String },

    #[error("invalid document path: {0}")]
    InvalidPath(String),

    #[error("store lock poisoned")]
    Poisoned,
}

impl Error {
    /// The category a failure of the local store falls under.
    pub fn category(&self) -> Category {
        match self {
            Error::InvalidPath(_) => Category::DataValidation,
            Error::Json(_) | Error::CorruptedData { .. } => Category::DataValidation,
            Error::Database(_) | Error::Io(_) | Error::Poisoned => Category::Database,
        }
    }
}

/// A specialized Result type for bh-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
