// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tunables for each component.
//!
//! All structs deserialize from TOML sections with every field optional;
//! missing fields fall back to the defaults documented on each field.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Network monitor configuration (`[monitor]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Probe target for the primary service.
    #[serde(default = "default_primary_url")]
    pub primary_url: String,
    /// Probe target for generic internet reachability.
    #[serde(default = "default_internet_url")]
    pub internet_url: String,
    /// Per-probe timeout in milliseconds (default: 5000).
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    /// Periodic check interval in milliseconds (default: 30000).
    #[serde(default = "default_check_interval_ms")]
    pub check_interval_ms: u64,
}

fn default_primary_url() -> String {
    "https://firestore.googleapis.com/".to_string()
}

fn default_internet_url() -> String {
    "https://www.google.com/favicon.ico".to_string()
}

fn default_probe_timeout_ms() -> u64 {
    5_000
}

fn default_check_interval_ms() -> u64 {
    30_000
}

impl MonitorConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn check_interval(&self) -> Duration {
        // A zero period would make tokio's interval panic.
        Duration::from_millis(self.check_interval_ms.max(1))
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            primary_url: default_primary_url(),
            internet_url: default_internet_url(),
            probe_timeout_ms: default_probe_timeout_ms(),
            check_interval_ms: default_check_interval_ms(),
        }
    }
}

/// Error reporting configuration (`[errors]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorConfig {
    /// Window in which identical errors are logged once (default: 60000).
    #[serde(default = "default_dedup_window_ms")]
    pub dedup_window_ms: u64,
}

fn default_dedup_window_ms() -> u64 {
    60_000
}

impl ErrorConfig {
    pub fn dedup_window(&self) -> Duration {
        Duration::from_millis(self.dedup_window_ms)
    }
}

impl Default for ErrorConfig {
    fn default() -> Self {
        ErrorConfig {
            dedup_window_ms: default_dedup_window_ms(),
        }
    }
}

/// Offline queue configuration (`[queue]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Failed replays after which an operation is dead-lettered (default: 3).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_max_attempts() -> u32 {
    3
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfig {
            max_attempts: default_max_attempts(),
        }
    }
}

/// Bounded exponential backoff policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first attempt (default: 3).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry; doubles each retry (default: 1000).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    1_000
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay_ms: u64) -> Self {
        RetryPolicy {
            max_retries,
            initial_delay_ms,
        }
    }

    /// Single attempt, no retries.
    pub fn none() -> Self {
        RetryPolicy::new(0, default_initial_delay_ms())
    }

    /// Delay before the given 1-indexed retry: `initial * 2^(retry-1)`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1);
        let factor = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
        Duration::from_millis(self.initial_delay_ms.saturating_mul(factor))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(default_max_retries(), default_initial_delay_ms())
    }
}

/// Sync engine configuration (`[sync]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Policy for direct writes while online (default: no retries, the
    /// queue is the fallback).
    #[serde(default = "RetryPolicy::none")]
    pub write_retry: RetryPolicy,
    /// Policy for each replayed queue entry (default: 2 retries, 1000ms).
    #[serde(default = "default_replay_retry")]
    pub replay_retry: RetryPolicy,
}

fn default_replay_retry() -> RetryPolicy {
    RetryPolicy::new(2, default_initial_delay_ms())
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            write_retry: RetryPolicy::none(),
            replay_retry: default_replay_retry(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
