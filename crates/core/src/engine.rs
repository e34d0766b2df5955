// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Read/write orchestration across the remote store, cache and queue.
//!
//! Writes go straight to the remote store while the monitor reports
//! online. Otherwise, or when the remote write fails, they are queued and
//! replayed by [`SyncEngine::sync_pending`]. A direct write never overtakes
//! queued operations for the same document. The cache is updated either
//! way so a caller always reads back its own writes.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::cache::{CacheKey, LocalCache};
use crate::classify::{ErrorOptions, ErrorReporter, Severity};
use crate::config::{QueueConfig, RetryPolicy, SyncConfig};
use crate::error::Result;
use crate::monitor::NetworkMonitor;
use crate::network::NetworkStatus;
use crate::queue::{DrainSummary, OfflineQueue, OperationType, PendingOperation};
use crate::remote::{DocumentStore, RemoteError};
use crate::retry::{RetryExecutor, RetryOptions};
use crate::store::KeyValueStore;
use crate::BoxFuture;

/// What happened to a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    /// Confirmed by the remote store.
    Applied,
    /// Recorded in the offline queue for later replay.
    Queued,
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOutcome::Applied => f.write_str("applied"),
            WriteOutcome::Queued => f.write_str("queued"),
        }
    }
}

/// Handle to the auto-sync task.
#[derive(Clone)]
pub struct AutoSyncHandle {
    token: CancellationToken,
}

impl AutoSyncHandle {
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }
}

/// Offline-tolerant document access.
pub struct SyncEngine {
    monitor: Arc<NetworkMonitor>,
    remote: Arc<dyn DocumentStore>,
    cache: LocalCache,
    queue: OfflineQueue,
    retry: RetryExecutor,
    config: SyncConfig,
    auto_sync: Mutex<Option<CancellationToken>>,
}

impl SyncEngine {
    pub fn new(
        monitor: Arc<NetworkMonitor>,
        remote: Arc<dyn DocumentStore>,
        store: Arc<dyn KeyValueStore>,
        reporter: Arc<ErrorReporter>,
        config: SyncConfig,
        queue_config: &QueueConfig,
    ) -> Self {
        SyncEngine {
            retry: RetryExecutor::new(Arc::clone(&monitor), reporter),
            cache: LocalCache::new(Arc::clone(&store)),
            queue: OfflineQueue::new(store, queue_config),
            monitor,
            remote,
            config,
            auto_sync: Mutex::new(None),
        }
    }

    pub fn monitor(&self) -> &Arc<NetworkMonitor> {
        &self.monitor
    }

    pub fn queue(&self) -> &OfflineQueue {
        &self.queue
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    /// Write a document (remote update).
    pub async fn save(&self, collection: &str, id: &str, data: Value) -> Result<WriteOutcome> {
        self.write(OperationType::Update, collection, id, Some(data))
            .await
    }

    /// Create a document (remote create).
    pub async fn create(&self, collection: &str, id: &str, data: Value) -> Result<WriteOutcome> {
        self.write(OperationType::Create, collection, id, Some(data))
            .await
    }

    /// Delete a document. The cache entry is removed either way.
    pub async fn delete(&self, collection: &str, id: &str) -> Result<WriteOutcome> {
        self.write(OperationType::Delete, collection, id, None).await
    }

    /// Read a document, preferring the remote copy when reachable.
    pub async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let key = CacheKey::new(collection, id)?;
        let cached = self.cache.get(&key).await?;
        if !self.monitor.is_online() {
            return Ok(cached);
        }

        match self.remote.get(collection, id).await {
            Ok(Some(fresh)) => {
                self.cache.put(&key, fresh.clone()).await?;
                Ok(Some(fresh))
            }
            Ok(None) => {
                if self.queue.has_pending(collection, id).await? {
                    return Ok(cached);
                }
                if cached.is_some() {
                    tracing::debug!(key = %key, "dropping stale cache entry");
                    self.cache.remove(&key).await?;
                }
                Ok(None)
            }
            Err(e) => {
                self.retry.reporter().log(
                    &e,
                    ErrorOptions::new()
                        .category(e.category())
                        .severity(Severity::Warning)
                        .context("collection", collection)
                        .context("document", id),
                );
                Ok(cached)
            }
        }
    }

    /// Replay queued operations against the remote store.
    ///
    /// Does nothing unless the monitor reports online, so that replays are
    /// not spent while unreachable.
    pub async fn sync_pending(&self) -> Result<DrainSummary> {
        if !self.monitor.is_online() {
            tracing::debug!(status = %self.monitor.status(), "not online, skipping sync");
            return Ok(DrainSummary::default());
        }

        let policy = self.config.replay_retry;
        self.queue
            .drain(|op: PendingOperation| async move {
                self.retry
                    .run(
                        || {
                            self.remote_call(
                                op.operation_type,
                                &op.collection_path,
                                &op.document_id,
                                op.payload.as_ref(),
                            )
                        },
                        options(policy, op.operation_type, &op.collection_path, &op.document_id)
                            .context("queued_id", op.id),
                    )
                    .await
            })
            .await
    }

    /// Run [`sync_pending`](Self::sync_pending) on every transition into
    /// online. The first observed state counts as a transition. Calling
    /// this while auto-sync is running returns a handle to that task.
    pub fn spawn_auto_sync(self: &Arc<Self>) -> AutoSyncHandle {
        let mut slot = match self.auto_sync.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(token) = slot.as_ref().filter(|t| !t.is_cancelled()) {
            return AutoSyncHandle {
                token: token.clone(),
            };
        }
        let token = CancellationToken::new();
        *slot = Some(token.clone());
        drop(slot);

        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.monitor.subscribe(move |state| {
            let _ = tx.send(state.status);
        });

        let engine = Arc::clone(self);
        let task_token = token.clone();
        tokio::spawn(async move {
            engine.run_auto_sync(rx, task_token).await;
            subscription.unsubscribe();
        });

        AutoSyncHandle { token }
    }

    async fn run_auto_sync(
        &self,
        mut statuses: mpsc::UnboundedReceiver<NetworkStatus>,
        token: CancellationToken,
    ) {
        tracing::debug!("auto-sync started");
        let mut previous: Option<NetworkStatus> = None;

        loop {
            let status = tokio::select! {
                _ = token.cancelled() => break,
                status = statuses.recv() => match status {
                    Some(status) => status,
                    None => break,
                },
            };
            // Every check passes through `checking`; only settled states count.
            if status == NetworkStatus::Checking {
                continue;
            }
            let became_online =
                status == NetworkStatus::Online && previous != Some(NetworkStatus::Online);
            previous = Some(status);
            if !became_online {
                continue;
            }

            tracing::info!("connectivity restored, syncing offline queue");
            match self.sync_pending().await {
                Ok(summary) => tracing::info!(
                    success = summary.success,
                    failed = summary.failed,
                    abandoned = summary.abandoned,
                    "auto-sync finished"
                ),
                Err(e) => {
                    self.retry
                        .reporter()
                        .log(&e, ErrorOptions::new().category(e.category()));
                }
            }
        }

        tracing::debug!("auto-sync stopped");
    }

    async fn write(
        &self,
        kind: OperationType,
        collection: &str,
        id: &str,
        payload: Option<Value>,
    ) -> Result<WriteOutcome> {
        let key = CacheKey::new(collection, id)?;

        let outcome = if !self.monitor.is_online() {
            tracing::debug!(op = %kind, key = %key, "offline, queueing");
            WriteOutcome::Queued
        } else if !self.replay_ahead_of(collection, id).await? {
            tracing::info!(op = %kind, key = %key, "older operations still queued, queueing behind them");
            WriteOutcome::Queued
        } else {
            let result = self
                .retry
                .run(
                    || self.remote_call(kind, collection, id, payload.as_ref()),
                    options(self.config.write_retry, kind, collection, id),
                )
                .await;
            match result {
                Ok(()) => WriteOutcome::Applied,
                Err(e) => {
                    tracing::info!(op = %kind, key = %key, error = %e, "remote write failed, queueing");
                    WriteOutcome::Queued
                }
            }
        };

        if outcome == WriteOutcome::Queued {
            self.queue
                .enqueue(kind, collection, id, payload.clone())
                .await?;
        }

        match (kind, payload) {
            (OperationType::Delete, _) | (_, None) => self.cache.remove(&key).await?,
            (_, Some(value)) => self.cache.put(&key, value).await?,
        }
        Ok(outcome)
    }

    /// Replay the queue if it holds operations for this document. Returns
    /// whether the document is clear for a direct write afterwards.
    async fn replay_ahead_of(&self, collection: &str, id: &str) -> Result<bool> {
        if !self.queue.has_pending(collection, id).await? {
            return Ok(true);
        }
        tracing::debug!(collection, document = id, "replaying queue ahead of direct write");
        self.sync_pending().await?;
        Ok(!self.queue.has_pending(collection, id).await?)
    }

    fn remote_call<'a>(
        &'a self,
        kind: OperationType,
        collection: &'a str,
        id: &'a str,
        payload: Option<&'a Value>,
    ) -> BoxFuture<'a, std::result::Result<(), RemoteError>> {
        match (kind, payload) {
            (OperationType::Create, Some(payload)) => self.remote.create(collection, id, payload),
            (OperationType::Update, Some(payload)) => self.remote.update(collection, id, payload),
            (OperationType::Delete, _) => self.remote.delete(collection, id),
            (_, None) => Box::pin(std::future::ready(Err(RemoteError::Decode(format!(
                "missing payload for {kind} {collection}/{id}"
            ))))),
        }
    }
}

fn options(
    policy: RetryPolicy,
    kind: OperationType,
    collection: &str,
    id: &str,
) -> RetryOptions<RemoteError> {
    RetryOptions::new(policy)
        .context("operation", kind.as_str())
        .context("collection", collection)
        .context("document", id)
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
