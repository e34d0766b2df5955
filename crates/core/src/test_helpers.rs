// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test doubles for core module tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;

use crate::config::MonitorConfig;
use crate::monitor::{NetworkMonitor, PlatformSignal, Probe, ProbeError};
use crate::remote::{DocumentStore, RemoteError};
use crate::BoxFuture;

pub const PRIMARY: &str = "https://primary.test/";
pub const INTERNET: &str = "https://internet.test/";

/// How a mocked endpoint answers.
#[derive(Debug, Clone, Copy)]
pub enum Reach {
    /// Succeeds after the delay.
    Ok(Duration),
    /// Fails after the delay.
    Fail(Duration),
    /// Never answers.
    Hang,
}

/// Probe whose per-URL outcome is scripted.
pub struct MockProbe {
    outcomes: Mutex<HashMap<String, Reach>>,
    calls: AtomicUsize,
}

impl MockProbe {
    pub fn new(primary: Reach, internet: Reach) -> Arc<Self> {
        let mut outcomes = HashMap::new();
        outcomes.insert(PRIMARY.to_string(), primary);
        outcomes.insert(INTERNET.to_string(), internet);
        Arc::new(MockProbe {
            outcomes: Mutex::new(outcomes),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn set(&self, url: &str, reach: Reach) {
        self.outcomes.lock().unwrap().insert(url.to_string(), reach);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Probe for MockProbe {
    fn probe<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<(), ProbeError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reach = self
            .outcomes
            .lock()
            .unwrap()
            .get(url)
            .copied()
            .unwrap_or(Reach::Fail(Duration::ZERO));
        Box::pin(async move {
            match reach {
                Reach::Ok(delay) => {
                    tokio::time::sleep(delay).await;
                    Ok(())
                }
                Reach::Fail(delay) => {
                    tokio::time::sleep(delay).await;
                    Err(ProbeError::Request("unreachable".to_string()))
                }
                Reach::Hang => std::future::pending().await,
            }
        })
    }
}

pub fn monitor_config() -> MonitorConfig {
    MonitorConfig {
        primary_url: PRIMARY.to_string(),
        internet_url: INTERNET.to_string(),
        ..MonitorConfig::default()
    }
}

/// Monitor plus the handles a test needs to drive it.
pub struct MonitorFixture {
    pub monitor: Arc<NetworkMonitor>,
    pub probe: Arc<MockProbe>,
    pub platform: PlatformSignal,
}

pub fn monitor_with(platform_online: bool, primary: Reach, internet: Reach) -> MonitorFixture {
    let probe = MockProbe::new(primary, internet);
    let platform = PlatformSignal::new(platform_online);
    let monitor = Arc::new(NetworkMonitor::new(
        monitor_config(),
        probe.clone(),
        platform.subscribe(),
    ));
    MonitorFixture {
        monitor,
        probe,
        platform,
    }
}

/// A monitor whose platform flag is fixed and never changes.
pub fn static_monitor(platform_online: bool, probe: Arc<MockProbe>) -> Arc<NetworkMonitor> {
    let (_tx, rx) = watch::channel(platform_online);
    Arc::new(NetworkMonitor::new(monitor_config(), probe, rx))
}

/// A call recorded by [`MockRemote`].
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    Create(String, String, Value),
    Update(String, String, Value),
    Delete(String, String),
    Get(String, String),
}

/// In-memory remote document store with scriptable failures.
#[derive(Default)]
pub struct MockRemote {
    docs: Mutex<HashMap<(String, String), Value>>,
    calls: Mutex<Vec<RemoteCall>>,
    failures: Mutex<VecDeque<RemoteError>>,
    always_fail: Mutex<Option<fn() -> RemoteError>>,
}

impl MockRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fail the next call with the given error.
    pub fn fail_next(&self, error: RemoteError) {
        self.failures.lock().unwrap().push_back(error);
    }

    /// Fail every call until cleared.
    pub fn fail_always(&self, make: Option<fn() -> RemoteError>) {
        *self.always_fail.lock().unwrap() = make;
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn doc(&self, collection: &str, id: &str) -> Option<Value> {
        self.docs
            .lock()
            .unwrap()
            .get(&(collection.to_string(), id.to_string()))
            .cloned()
    }

    pub fn insert(&self, collection: &str, id: &str, value: Value) {
        self.docs
            .lock()
            .unwrap()
            .insert((collection.to_string(), id.to_string()), value);
    }

    fn record(&self, call: RemoteCall) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(call);
        if let Some(make) = *self.always_fail.lock().unwrap() {
            return Err(make());
        }
        match self.failures.lock().unwrap().pop_front() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl DocumentStore for MockRemote {
    fn create<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        payload: &'a Value,
    ) -> BoxFuture<'a, Result<(), RemoteError>> {
        Box::pin(async move {
            self.record(RemoteCall::Create(
                collection.to_string(),
                id.to_string(),
                payload.clone(),
            ))?;
            self.insert(collection, id, payload.clone());
            Ok(())
        })
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        payload: &'a Value,
    ) -> BoxFuture<'a, Result<(), RemoteError>> {
        Box::pin(async move {
            self.record(RemoteCall::Update(
                collection.to_string(),
                id.to_string(),
                payload.clone(),
            ))?;
            self.insert(collection, id, payload.clone());
            Ok(())
        })
    }

    fn delete<'a>(&'a self, collection: &'a str, id: &'a str) -> BoxFuture<'a, Result<(), RemoteError>> {
        Box::pin(async move {
            self.record(RemoteCall::Delete(collection.to_string(), id.to_string()))?;
            self.docs
                .lock()
                .unwrap()
                .remove(&(collection.to_string(), id.to_string()));
            Ok(())
        })
    }

    fn get<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Value>, RemoteError>> {
        Box::pin(async move {
            self.record(RemoteCall::Get(collection.to_string(), id.to_string()))?;
            Ok(self.doc(collection, id))
        })
    }
}
