// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Active connectivity detection.
//!
//! The [`NetworkMonitor`] owns the process-wide [`NetworkState`]. A check
//! probes two endpoints concurrently, one for the primary service and one
//! for generic internet access, and classifies the result:
//!
//! ```text
//! primary  generic   status    quality
//!   ok       ok      online    by latency (<300 good, <1000 poor, else bad)
//!   fail     ok      limited   poor
//!   any      fail    offline   bad
//! ```
//!
//! Checks run on demand, on platform online/offline signals, and on a
//! periodic timer once [`NetworkMonitor::start_monitoring`] is called.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::MonitorConfig;
use crate::network::{NetworkState, NetworkStatus};
use crate::BoxFuture;

/// Error type for a single reachability probe.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The probe did not answer in time.
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),

    /// The request could not be completed.
    #[error("probe request failed: {0}")]
    Request(String),
}

/// Lightweight reachability check against a URL.
///
/// Any completed request counts as reachable; the response status is not
/// inspected.
pub trait Probe: Send + Sync {
    fn probe<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<(), ProbeError>>;
}

/// The platform's own view of connectivity: a boolean plus change
/// notifications.
pub struct PlatformSignal {
    tx: watch::Sender<bool>,
}

impl PlatformSignal {
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        PlatformSignal { tx }
    }

    /// Report a platform connectivity change. Subscribers are notified only
    /// when the value actually changes.
    pub fn set_online(&self, online: bool) {
        self.tx.send_if_modified(|current| {
            let changed = *current != online;
            *current = online;
            changed
        });
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

type Listener = Arc<dyn Fn(&NetworkState) + Send + Sync>;
type ListenerList = Mutex<Vec<(u64, Listener)>>;

/// Handle returned by [`NetworkMonitor::subscribe`].
pub struct Subscription {
    id: u64,
    listeners: Weak<ListenerList>,
}

impl Subscription {
    /// Stop receiving state changes.
    pub fn unsubscribe(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            if let Ok(mut list) = listeners.lock() {
                list.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

/// Handle to the background monitoring task.
#[derive(Clone)]
pub struct MonitorHandle {
    token: CancellationToken,
}

impl MonitorHandle {
    /// Stop periodic checks and platform signal handling.
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }
}

/// Clears the in-flight flag even if the check future is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Maintains and publishes the current [`NetworkState`].
pub struct NetworkMonitor {
    config: MonitorConfig,
    probe: Arc<dyn Probe>,
    platform: watch::Receiver<bool>,
    state: Mutex<NetworkState>,
    listeners: Arc<ListenerList>,
    next_listener_id: AtomicU64,
    check_in_progress: AtomicBool,
    monitoring: Mutex<Option<CancellationToken>>,
}

impl NetworkMonitor {
    /// Create a monitor. The initial state follows the platform flag.
    pub fn new(
        config: MonitorConfig,
        probe: Arc<dyn Probe>,
        platform: watch::Receiver<bool>,
    ) -> Self {
        let initial = NetworkState::initial(*platform.borrow());
        NetworkMonitor {
            config,
            probe,
            platform,
            state: Mutex::new(initial),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_listener_id: AtomicU64::new(0),
            check_in_progress: AtomicBool::new(false),
            monitoring: Mutex::new(None),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> NetworkState {
        match self.state.lock() {
            Ok(state) => state.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn status(&self) -> NetworkStatus {
        self.state().status
    }

    pub fn is_online(&self) -> bool {
        self.status() == NetworkStatus::Online
    }

    /// What the platform itself reports, independent of probes.
    pub fn platform_online(&self) -> bool {
        *self.platform.borrow()
    }

    /// Run a connectivity check and publish the result.
    ///
    /// If an unforced check is requested while another check is in flight,
    /// the current state is returned unchanged. Forced checks always run.
    pub async fn check_connectivity(&self, force: bool) -> NetworkState {
        let already_running = self.check_in_progress.swap(true, Ordering::AcqRel);
        if already_running && !force {
            tracing::trace!("connectivity check already in flight");
            return self.state();
        }
        let _guard = InFlight(&self.check_in_progress);

        self.publish(self.state().checking());

        if !self.platform_online() {
            return self.settle_offline();
        }

        let timeout = self.config.probe_timeout();
        let started = Instant::now();
        let (primary, generic) = tokio::join!(
            self.reachable(&self.config.primary_url, timeout),
            self.reachable(&self.config.internet_url, timeout),
        );
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let state = NetworkState::from_probes(primary, generic, latency_ms, Utc::now());
        tracing::info!(
            status = %state.status,
            quality = %state.quality,
            latency_ms,
            "connectivity checked"
        );
        self.publish(state.clone());
        state
    }

    /// Register a listener. It is called right away with the current
    /// state, then on every state replacement.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&NetworkState) + Send + Sync + 'static,
    {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        let listener: Listener = Arc::new(listener);
        if let Ok(mut list) = self.listeners.lock() {
            list.push((id, Arc::clone(&listener)));
        }
        listener(&self.state());

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Start the initial check, platform signal handling, and periodic
    /// checks in a background task. Calling this while monitoring is
    /// already running returns a handle to the running task.
    pub fn start_monitoring(self: &Arc<Self>) -> MonitorHandle {
        let mut slot = match self.monitoring.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(token) = slot.as_ref().filter(|t| !t.is_cancelled()) {
            return MonitorHandle {
                token: token.clone(),
            };
        }

        let token = CancellationToken::new();
        *slot = Some(token.clone());
        drop(slot);

        let monitor = Arc::clone(self);
        let task_token = token.clone();
        tokio::spawn(async move {
            monitor.run_monitoring(task_token).await;
        });

        MonitorHandle { token }
    }

    async fn run_monitoring(&self, token: CancellationToken) {
        tracing::debug!(
            interval_ms = self.config.check_interval_ms,
            "network monitoring started"
        );
        self.check_connectivity(false).await;

        let interval = self.config.check_interval();
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut platform = self.platform.clone();
        let mut platform_open = true;

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                changed = platform.changed(), if platform_open => {
                    if changed.is_err() {
                        tracing::debug!("platform signal closed");
                        platform_open = false;
                        continue;
                    }
                    let online = *platform.borrow_and_update();
                    if online {
                        tracing::debug!("platform reports online");
                        self.check_connectivity(true).await;
                    } else {
                        tracing::debug!("platform reports offline");
                        self.settle_offline();
                    }
                }
                _ = ticker.tick() => {
                    self.check_connectivity(false).await;
                }
            }
        }

        tracing::debug!("network monitoring stopped");
    }

    async fn reachable(&self, url: &str, timeout: Duration) -> bool {
        match tokio::time::timeout(timeout, self.probe.probe(url)).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                tracing::debug!(url, error = %e, "probe failed");
                false
            }
            Err(_) => {
                tracing::debug!(url, error = %ProbeError::Timeout(timeout), "probe failed");
                false
            }
        }
    }

    fn settle_offline(&self) -> NetworkState {
        let state = self.state().settled_offline(Utc::now());
        tracing::info!("platform offline, skipping probes");
        self.publish(state.clone());
        state
    }

    fn publish(&self, state: NetworkState) {
        match self.state.lock() {
            Ok(mut current) => *current = state.clone(),
            Err(poisoned) => *poisoned.into_inner() = state.clone(),
        }

        let listeners: Vec<Listener> = match self.listeners.lock() {
            Ok(list) => list.iter().map(|(_, l)| Arc::clone(l)).collect(),
            Err(_) => Vec::new(),
        };
        for listener in listeners {
            listener(&state);
        }
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
