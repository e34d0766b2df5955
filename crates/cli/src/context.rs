// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wiring of the core components for one CLI invocation.

use std::fs;
use std::sync::Arc;

use bh_core::{
    DocumentStore, ErrorReporter, KeyValueStore, NetworkMonitor, PlatformSignal, Probe,
    SqliteStore, SyncEngine,
};

use crate::config::Config;
use crate::error::Result;
use crate::http::{self, HttpDocumentStore, HttpProbe};

/// Everything a command needs: the engine plus the pieces it is built on.
pub struct Context {
    pub engine: Arc<SyncEngine>,
    pub monitor: Arc<NetworkMonitor>,
    pub reporter: Arc<ErrorReporter>,
    /// Kept alive so the monitor's platform receiver stays open.
    pub platform: PlatformSignal,
}

impl Context {
    /// Open the local store under the data directory and connect the HTTP
    /// collaborators. `offline` makes the platform report no network.
    pub fn open(config: &Config, offline: bool) -> Result<Self> {
        let data_dir = config.data_dir()?;
        fs::create_dir_all(&data_dir)?;
        let db_path = config.db_path()?;
        tracing::debug!(path = %db_path.display(), "opening local store");
        let store = Arc::new(SqliteStore::open(&db_path)?);

        let probe = HttpProbe::new(http::client(config.monitor.probe_timeout())?);
        let remote = HttpDocumentStore::new(
            http::client(config.remote.request_timeout())?,
            &config.remote.base_url,
        );

        Ok(Context::from_parts(
            config,
            Arc::new(probe),
            Arc::new(remote),
            store,
            !offline,
        ))
    }

    /// Assemble a context from explicit collaborators.
    pub fn from_parts(
        config: &Config,
        probe: Arc<dyn Probe>,
        remote: Arc<dyn DocumentStore>,
        store: Arc<dyn KeyValueStore>,
        platform_online: bool,
    ) -> Self {
        let platform = PlatformSignal::new(platform_online);
        let monitor = Arc::new(NetworkMonitor::new(
            config.monitor.clone(),
            probe,
            platform.subscribe(),
        ));
        let reporter = Arc::new(ErrorReporter::with_dedup_window(
            config.errors.dedup_window(),
        ));
        let engine = Arc::new(SyncEngine::new(
            Arc::clone(&monitor),
            remote,
            store,
            Arc::clone(&reporter),
            config.sync.clone(),
            &config.queue,
        ));

        Context {
            engine,
            monitor,
            reporter,
            platform,
        }
    }
}
