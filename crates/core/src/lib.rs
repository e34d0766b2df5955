// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! bh-core: connectivity-resilience layer for the backhaul client.
//!
//! Lets a client keep mutating remote documents while the network is absent,
//! degraded or flaky, and reconciles those mutations once it comes back.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   save/get/delete   ┌──────────────┐
//! │   caller     │────────────────────►│  SyncEngine  │──────► DocumentStore
//! └──────────────┘                     └──────────────┘        (remote)
//!                                        │    │    │
//!                          ┌─────────────┘    │    └──────────────┐
//!                          ▼                  ▼                   ▼
//!                 ┌────────────────┐  ┌──────────────┐   ┌──────────────┐
//!                 │ NetworkMonitor │  │ OfflineQueue │   │  LocalCache  │
//!                 └────────────────┘  └──────────────┘   └──────────────┘
//!                          │                  └────────┬──────────┘
//!                          ▼                           ▼
//!                       Probe                    KeyValueStore
//! ```
//!
//! Failures from every component are classified by the [`ErrorReporter`]
//! and retried through the [`RetryExecutor`] where appropriate.

use std::future::Future;
use std::pin::Pin;

pub mod cache;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod monitor;
pub mod network;
pub mod queue;
pub mod remote;
pub mod retry;
pub mod store;

#[cfg(test)]
mod test_helpers;

pub use cache::{CacheEntry, CacheKey, LocalCache};
pub use classify::{
    AppError, Category, ErrorOptions, ErrorReporter, Failure, ObserverHandle, Severity,
};
pub use config::{ErrorConfig, MonitorConfig, QueueConfig, RetryPolicy, SyncConfig};
pub use engine::{AutoSyncHandle, SyncEngine, WriteOutcome};
pub use error::{Error, Result};
pub use monitor::{MonitorHandle, NetworkMonitor, PlatformSignal, Probe, ProbeError, Subscription};
pub use network::{NetworkState, NetworkStatus, Quality};
pub use queue::{DrainSummary, OfflineQueue, OperationType, PendingOperation};
pub use remote::{DocumentStore, RemoteError};
pub use retry::{RetryExecutor, RetryOptions};
pub use store::{KeyValueStore, MemoryStore, SqliteStore};

/// Boxed future returned by the collaborator traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
