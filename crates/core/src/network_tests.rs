// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    zero = { 0, Quality::Good },
    fast = { 150, Quality::Good },
    edge_below_poor = { 299, Quality::Good },
    poor_lower_bound = { 300, Quality::Poor },
    poor = { 650, Quality::Poor },
    edge_below_bad = { 999, Quality::Poor },
    bad_lower_bound = { 1000, Quality::Bad },
    very_slow = { 4999, Quality::Bad },
)]
fn quality_buckets(latency_ms: u64, expected: Quality) {
    assert_eq!(Quality::from_latency_ms(latency_ms), expected);

    let state = NetworkState::from_probes(true, true, latency_ms, Utc::now());
    assert_eq!(state.status, NetworkStatus::Online);
    assert_eq!(state.quality, expected);
}

#[parameterized(
    both = { true, true, NetworkStatus::Online },
    generic_only = { false, true, NetworkStatus::Limited },
    primary_only = { true, false, NetworkStatus::Offline },
    neither = { false, false, NetworkStatus::Offline },
)]
fn status_from_probes(primary: bool, generic: bool, expected: NetworkStatus) {
    let state = NetworkState::from_probes(primary, generic, 100, Utc::now());
    assert_eq!(state.status, expected);
    assert_eq!(state.is_primary_reachable, primary);
    assert_eq!(state.is_generic_internet_reachable, generic);
    assert_eq!(state.latency_ms, Some(100));
    assert!(state.last_checked_at.is_some());
}

#[test]
fn limited_is_always_poor() {
    let state = NetworkState::from_probes(false, true, 10, Utc::now());
    assert_eq!(state.quality, Quality::Poor);
}

#[test]
fn offline_is_always_bad() {
    for latency in [0, 150, 5000] {
        let state = NetworkState::from_probes(false, false, latency, Utc::now());
        assert_eq!(state.quality, Quality::Bad);
    }
    let settled = NetworkState::initial(true).settled_offline(Utc::now());
    assert_eq!(settled.quality, Quality::Bad);
}

#[test]
fn initial_state_follows_platform_flag() {
    let online = NetworkState::initial(true);
    assert_eq!(online.status, NetworkStatus::Online);
    assert_eq!(online.quality, Quality::Unknown);
    assert!(online.latency_ms.is_none());
    assert!(online.last_checked_at.is_none());

    let offline = NetworkState::initial(false);
    assert_eq!(offline.status, NetworkStatus::Offline);
}

#[test]
fn settled_offline_keeps_latency() {
    let previous = NetworkState::from_probes(true, true, 120, Utc::now());
    let settled = previous.settled_offline(Utc::now());
    assert_eq!(settled.status, NetworkStatus::Offline);
    assert_eq!(settled.latency_ms, Some(120));
    assert!(!settled.is_primary_reachable);
    assert!(!settled.is_generic_internet_reachable);
}

#[test]
fn checking_preserves_other_fields() {
    let previous = NetworkState::from_probes(true, true, 120, Utc::now());
    let checking = previous.checking();
    assert_eq!(checking.status, NetworkStatus::Checking);
    assert_eq!(checking.quality, previous.quality);
    assert_eq!(checking.latency_ms, previous.latency_ms);
}

#[test]
fn state_serializes_snake_case() {
    let state = NetworkState::from_probes(false, true, 10, Utc::now());
    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["status"], "limited");
    assert_eq!(json["quality"], "poor");
}
