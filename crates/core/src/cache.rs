// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Latest-value mirror of remote documents, for offline reads.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::store::KeyValueStore;

/// Prefix separating cache entries from other data in the shared store.
const PREFIX: &str = "cache/";

/// Identifies a cached document: `collection/id`, optionally `/sub_key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    collection: String,
    id: String,
    sub_key: Option<String>,
}

impl CacheKey {
    /// Build a key. Collection paths may nest (`drivers/d1/trips`), but
    /// no segment may be empty and the id may not contain `/`.
    pub fn new(collection: &str, id: &str) -> Result<Self> {
        if collection.is_empty() || collection.split('/').any(str::is_empty) {
            return Err(Error::InvalidPath(format!(
                "collection '{collection}' has an empty segment"
            )));
        }
        validate_segment("document id", id)?;
        Ok(CacheKey {
            collection: collection.to_string(),
            id: id.to_string(),
            sub_key: None,
        })
    }

    pub fn with_sub_key(mut self, sub_key: &str) -> Result<Self> {
        validate_segment("sub key", sub_key)?;
        self.sub_key = Some(sub_key.to_string());
        Ok(self)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn storage_key(&self) -> String {
        format!("{PREFIX}{self}")
    }
}

fn validate_segment(what: &str, value: &str) -> Result<()> {
    if value.is_empty() || value.contains('/') {
        return Err(Error::InvalidPath(format!(
            "{what} '{value}' must be non-empty and contain no '/'"
        )));
    }
    Ok(())
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)?;
        if let Some(sub) = &self.sub_key {
            write!(f, "/{sub}")?;
        }
        Ok(())
    }
}

/// A cached value and when it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub value: Value,
    pub timestamp: DateTime<Utc>,
}

/// Pass-through cache over a [`KeyValueStore`]. No expiry, no versions;
/// a later `put` overwrites.
#[derive(Clone)]
pub struct LocalCache {
    store: Arc<dyn KeyValueStore>,
}

impl LocalCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        LocalCache { store }
    }

    pub async fn put(&self, key: &CacheKey, value: Value) -> Result<()> {
        let entry = CacheEntry {
            key: key.to_string(),
            value,
            timestamp: Utc::now(),
        };
        tracing::debug!(key = %entry.key, "cache put");
        self.store
            .set(&key.storage_key(), serde_json::to_value(&entry)?)
            .await
    }

    pub async fn get(&self, key: &CacheKey) -> Result<Option<Value>> {
        Ok(self.entry(key).await?.map(|entry| entry.value))
    }

    pub async fn entry(&self, key: &CacheKey) -> Result<Option<CacheEntry>> {
        let storage_key = key.storage_key();
        let Some(raw) = self.store.get(&storage_key).await? else {
            return Ok(None);
        };
        serde_json::from_value(raw)
            .map(Some)
            .map_err(|e| Error::CorruptedData {
                key: storage_key,
                reason: e.to_string(),
            })
    }

    pub async fn remove(&self, key: &CacheKey) -> Result<()> {
        tracing::debug!(key = %key, "cache remove");
        self.store.delete(&key.storage_key()).await
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
