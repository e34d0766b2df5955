// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity state model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse connectivity status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkStatus {
    /// Both the primary service and the generic internet are reachable.
    Online,
    /// Nothing is reachable, or the platform reports no network.
    Offline,
    /// A check is in flight.
    Checking,
    /// The internet is reachable but the primary service is not.
    Limited,
}

impl NetworkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkStatus::Online => "online",
            NetworkStatus::Offline => "offline",
            NetworkStatus::Checking => "checking",
            NetworkStatus::Limited => "limited",
        }
    }
}

impl fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latency-derived connection quality, independent of reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Good,
    Poor,
    Bad,
    Unknown,
}

impl Quality {
    /// Bucket a round-trip latency: <300ms good, <1000ms poor, else bad.
    pub fn from_latency_ms(latency_ms: u64) -> Self {
        if latency_ms < 300 {
            Quality::Good
        } else if latency_ms < 1000 {
            Quality::Poor
        } else {
            Quality::Bad
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Good => "good",
            Quality::Poor => "poor",
            Quality::Bad => "bad",
            Quality::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of connectivity. Replaced wholesale on every check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkState {
    pub status: NetworkStatus,
    pub quality: Quality,
    /// Wall-clock duration of the most recent probe round.
    pub latency_ms: Option<u64>,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub is_primary_reachable: bool,
    pub is_generic_internet_reachable: bool,
}

impl NetworkState {
    /// Initial state derived from the platform's online flag, before any
    /// probe has run.
    pub fn initial(platform_online: bool) -> Self {
        NetworkState {
            status: if platform_online {
                NetworkStatus::Online
            } else {
                NetworkStatus::Offline
            },
            quality: Quality::Unknown,
            latency_ms: None,
            last_checked_at: None,
            is_primary_reachable: false,
            is_generic_internet_reachable: false,
        }
    }

    /// The state published while a check is in flight.
    pub fn checking(&self) -> Self {
        NetworkState {
            status: NetworkStatus::Checking,
            ..self.clone()
        }
    }

    /// The settled state when the platform reports no network. Latency from
    /// the previous round is carried over.
    pub fn settled_offline(&self, at: DateTime<Utc>) -> Self {
        NetworkState {
            status: NetworkStatus::Offline,
            quality: Quality::Bad,
            latency_ms: self.latency_ms,
            last_checked_at: Some(at),
            is_primary_reachable: false,
            is_generic_internet_reachable: false,
        }
    }

    /// Classify the outcome of a probe round.
    pub fn from_probes(
        primary: bool,
        generic: bool,
        latency_ms: u64,
        at: DateTime<Utc>,
    ) -> Self {
        let (status, quality) = match (primary, generic) {
            (true, true) => (NetworkStatus::Online, Quality::from_latency_ms(latency_ms)),
            (false, true) => (NetworkStatus::Limited, Quality::Poor),
            _ => (NetworkStatus::Offline, Quality::Bad),
        };

        NetworkState {
            status,
            quality,
            latency_ms: Some(latency_ms),
            last_checked_at: Some(at),
            is_primary_reachable: primary,
            is_generic_internet_reachable: generic,
        }
    }

    pub fn is_online(&self) -> bool {
        self.status == NetworkStatus::Online
    }

    pub fn is_offline(&self) -> bool {
        self.status == NetworkStatus::Offline
    }
}

#[cfg(test)]
#[path = "network_tests.rs"]
mod tests;
