// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The remote document store, seen as an opaque CRUD service.

use serde_json::Value;
use thiserror::Error;

use crate::classify::{Category, Failure};
use crate::BoxFuture;

/// Failure talking to the remote document store.
///
/// Each variant carries an explicit [`Category`], so keyword inference is
/// never needed for remote failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The request never reached the store or the connection dropped.
    #[error("network error: {0}")]
    Network(String),

    /// The store answered with a non-success status.
    #[error("remote returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response could not be decoded.
    #[error("could not decode remote response: {0}")]
    Decode(String),

    #[error("operation not supported by remote store: {0}")]
    NotSupported(String),
}

impl RemoteError {
    pub fn category(&self) -> Category {
        match self {
            RemoteError::Network(_) => Category::Network,
            RemoteError::Status { status: 401, .. } => Category::Authentication,
            RemoteError::Status { status: 403, .. } => Category::Authorization,
            RemoteError::Status {
                status: 400 | 409 | 422,
                ..
            } => Category::DataValidation,
            RemoteError::Status { .. } | RemoteError::Decode(_) | RemoteError::NotSupported(_) => {
                Category::Api
            }
        }
    }

    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoteError::Network(_) => true,
            RemoteError::Status { status, .. } => {
                matches!(status, 408 | 429) || (500..600).contains(status)
            }
            RemoteError::Decode(_) | RemoteError::NotSupported(_) => false,
        }
    }
}

impl Failure for RemoteError {
    fn category(&self) -> Option<Category> {
        Some(RemoteError::category(self))
    }

    fn is_retryable(&self) -> bool {
        RemoteError::is_retryable(self)
    }
}

/// Remote document store addressed by `collection/id`.
///
/// Writes are last-write-wins; the layer does no conflict resolution.
pub trait DocumentStore: Send + Sync {
    fn create<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        payload: &'a Value,
    ) -> BoxFuture<'a, Result<(), RemoteError>>;

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        payload: &'a Value,
    ) -> BoxFuture<'a, Result<(), RemoteError>>;

    fn delete<'a>(&'a self, collection: &'a str, id: &'a str)
        -> BoxFuture<'a, Result<(), RemoteError>>;

    /// `Ok(None)` when the document does not exist.
    fn get<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Value>, RemoteError>>;
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
