// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline queue for mutations that could not reach the remote store.
//!
//! Operations are kept in enqueue order in the key-value store and replayed
//! by [`OfflineQueue::drain`]. An operation that keeps failing is moved to a
//! dead-letter list after `max_attempts` replays instead of being dropped.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::QueueConfig;
use crate::error::{Error, Result};
use crate::store::KeyValueStore;

const PENDING_KEY: &str = "offline_queue/pending";
const DEAD_LETTER_KEY: &str = "offline_queue/dead_letters";
const NEXT_ID_KEY: &str = "offline_queue/next_id";

/// Kind of mutation recorded in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Create,
    Update,
    Delete,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Create => "create",
            OperationType::Update => "update",
            OperationType::Delete => "delete",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A queued mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOperation {
    /// Sequence number assigned at enqueue.
    pub id: u64,
    pub operation_type: OperationType,
    pub collection_path: String,
    pub document_id: String,
    /// Absent for deletes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// Failed replays so far.
    pub attempts: u32,
    pub enqueued_at: DateTime<Utc>,
}

impl PendingOperation {
    pub fn targets(&self, collection: &str, id: &str) -> bool {
        self.collection_path == collection && self.document_id == id
    }
}

/// Outcome of one drain. `failed` includes the abandoned operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrainSummary {
    pub success: usize,
    pub failed: usize,
    pub abandoned: usize,
}

/// Durable FIFO of pending operations plus the dead-letter list.
pub struct OfflineQueue {
    store: Arc<dyn KeyValueStore>,
    max_attempts: u32,
    /// Serializes read-modify-write cycles on the stored lists.
    lists: Mutex<()>,
    /// Only one drain runs at a time.
    draining: Mutex<()>,
}

impl OfflineQueue {
    pub fn new(store: Arc<dyn KeyValueStore>, config: &QueueConfig) -> Self {
        OfflineQueue {
            store,
            max_attempts: config.max_attempts.max(1),
            lists: Mutex::new(()),
            draining: Mutex::new(()),
        }
    }

    /// Append an operation with zero attempts.
    pub async fn enqueue(
        &self,
        operation_type: OperationType,
        collection_path: &str,
        document_id: &str,
        payload: Option<Value>,
    ) -> Result<PendingOperation> {
        let _lists = self.lists.lock().await;

        let id = self.load::<u64>(NEXT_ID_KEY).await?.unwrap_or(0);
        let operation = PendingOperation {
            id,
            operation_type,
            collection_path: collection_path.to_string(),
            document_id: document_id.to_string(),
            payload,
            attempts: 0,
            enqueued_at: Utc::now(),
        };

        let mut pending = self.load_list(PENDING_KEY).await?;
        pending.push(operation.clone());
        self.save(PENDING_KEY, &pending).await?;
        self.save(NEXT_ID_KEY, &(id + 1)).await?;

        tracing::debug!(
            id,
            op = %operation_type,
            collection = collection_path,
            document = document_id,
            queued = pending.len(),
            "operation queued"
        );
        Ok(operation)
    }

    /// Replay every operation queued when the drain starts, in order.
    ///
    /// Successful operations are removed. Failed ones have their attempt
    /// count bumped and are dead-lettered once it reaches `max_attempts`.
    /// Operations enqueued during the drain wait for the next one.
    pub async fn drain<F, Fut, E>(&self, mut apply: F) -> Result<DrainSummary>
    where
        F: FnMut(PendingOperation) -> Fut,
        Fut: Future<Output = std::result::Result<(), E>>,
        E: fmt::Display,
    {
        let _draining = self.draining.lock().await;
        let snapshot = {
            let _lists = self.lists.lock().await;
            self.load_list(PENDING_KEY).await?
        };

        let mut summary = DrainSummary::default();
        if snapshot.is_empty() {
            return Ok(summary);
        }
        tracing::debug!(count = snapshot.len(), "draining offline queue");

        for operation in snapshot {
            let id = operation.id;
            match apply(operation.clone()).await {
                Ok(()) => {
                    self.remove_pending(id).await?;
                    summary.success += 1;
                }
                Err(e) => {
                    summary.failed += 1;
                    let attempts = operation.attempts.saturating_add(1);
                    if attempts >= self.max_attempts {
                        tracing::warn!(
                            id,
                            op = %operation.operation_type,
                            collection = %operation.collection_path,
                            document = %operation.document_id,
                            attempts,
                            error = %e,
                            "abandoning queued operation"
                        );
                        self.dead_letter(id, attempts).await?;
                        summary.abandoned += 1;
                    } else {
                        tracing::debug!(id, attempts, error = %e, "queued operation failed");
                        self.set_attempts(id, attempts).await?;
                    }
                }
            }
        }

        tracing::info!(
            success = summary.success,
            failed = summary.failed,
            abandoned = summary.abandoned,
            "offline queue drained"
        );
        Ok(summary)
    }

    /// Queued operations in enqueue order.
    pub async fn pending(&self) -> Result<Vec<PendingOperation>> {
        let _lists = self.lists.lock().await;
        self.load_list(PENDING_KEY).await
    }

    pub async fn len(&self) -> Result<usize> {
        Ok(self.pending().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Whether any queued operation targets the given document.
    pub async fn has_pending(&self, collection: &str, id: &str) -> Result<bool> {
        Ok(self
            .pending()
            .await?
            .iter()
            .any(|op| op.targets(collection, id)))
    }

    /// Operations abandoned after too many failed replays.
    pub async fn dead_letters(&self) -> Result<Vec<PendingOperation>> {
        let _lists = self.lists.lock().await;
        self.load_list(DEAD_LETTER_KEY).await
    }

    /// Drop all dead letters, returning how many there were.
    pub async fn clear_dead_letters(&self) -> Result<usize> {
        let _lists = self.lists.lock().await;
        let dead = self.load_list(DEAD_LETTER_KEY).await?;
        self.store.delete(DEAD_LETTER_KEY).await?;
        Ok(dead.len())
    }

    /// Move all dead letters back to the end of the queue with their
    /// attempt counts reset. Returns how many were moved.
    pub async fn requeue_dead_letters(&self) -> Result<usize> {
        let _lists = self.lists.lock().await;
        let dead = self.load_list(DEAD_LETTER_KEY).await?;
        if dead.is_empty() {
            return Ok(0);
        }

        let mut pending = self.load_list(PENDING_KEY).await?;
        let moved = dead.len();
        pending.extend(dead.into_iter().map(|mut op| {
            op.attempts = 0;
            op
        }));
        self.save(PENDING_KEY, &pending).await?;
        self.store.delete(DEAD_LETTER_KEY).await?;

        tracing::info!(count = moved, "dead letters requeued");
        Ok(moved)
    }

    async fn remove_pending(&self, id: u64) -> Result<()> {
        let _lists = self.lists.lock().await;
        let mut pending = self.load_list(PENDING_KEY).await?;
        pending.retain(|op| op.id != id);
        self.save(PENDING_KEY, &pending).await
    }

    async fn set_attempts(&self, id: u64, attempts: u32) -> Result<()> {
        let _lists = self.lists.lock().await;
        let mut pending = self.load_list(PENDING_KEY).await?;
        if let Some(op) = pending.iter_mut().find(|op| op.id == id) {
            op.attempts = attempts;
        }
        self.save(PENDING_KEY, &pending).await
    }

    async fn dead_letter(&self, id: u64, attempts: u32) -> Result<()> {
        let _lists = self.lists.lock().await;
        let mut pending = self.load_list(PENDING_KEY).await?;
        let Some(index) = pending.iter().position(|op| op.id == id) else {
            return Ok(());
        };
        let mut operation = pending.remove(index);
        operation.attempts = attempts;

        let mut dead = self.load_list(DEAD_LETTER_KEY).await?;
        dead.push(operation);
        self.save(DEAD_LETTER_KEY, &dead).await?;
        self.save(PENDING_KEY, &pending).await
    }

    async fn load_list(&self, key: &str) -> Result<Vec<PendingOperation>> {
        Ok(self.load(key).await?.unwrap_or_default())
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };
        serde_json::from_value(raw)
            .map(Some)
            .map_err(|e| Error::CorruptedData {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    async fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.store.set(key, serde_json::to_value(value)?).await
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
