// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI configuration.
//!
//! Configuration is read from TOML. Every section and field is optional:
//!
//! ```toml
//! data_dir = "/var/lib/backhaul"
//!
//! [monitor]
//! primary_url = "https://api.example.com/health"
//! internet_url = "https://www.google.com/favicon.ico"
//!
//! [sync]
//! replay_retry = { max_retries = 2, initial_delay_ms = 1000 }
//!
//! [remote]
//! base_url = "https://api.example.com/v1/documents"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bh_core::{ErrorConfig, MonitorConfig, QueueConfig, SyncConfig};
use serde::{Deserialize, Serialize};

use crate::env;
use crate::error::{Error, Result};

const APP_DIR_NAME: &str = "backhaul";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "backhaul.db";

/// Full CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where the local store lives. Overrides `BACKHAUL_DATA_DIR`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub errors: ErrorConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// HTTP document store settings (`[remote]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Documents live at `<base_url>/<collection>/<id>`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds (default: 10000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080/documents".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

impl RemoteConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Config {
    /// Load configuration from `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(Error::Config(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Load from the resolved config path, or defaults if there is none.
    pub fn load_resolved(explicit: Option<&Path>) -> Result<Self> {
        match resolve_config_path(explicit) {
            Some(path) => Config::load(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Data directory: config value, else `BACKHAUL_DATA_DIR`, else the
    /// platform's local data directory.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        if let Some(dir) = env::data_dir() {
            return Ok(dir);
        }
        dirs::data_local_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("cannot determine a data directory".to_string()))
    }

    /// Path of the SQLite store inside the data directory.
    pub fn db_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(DB_FILE_NAME))
    }
}

/// Config path: `--config`, else `BACKHAUL_CONFIG`, else the platform's
/// config directory.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(env::config_path)
        .or_else(|| dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME)))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
