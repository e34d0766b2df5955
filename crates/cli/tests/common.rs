// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// `backhaul` isolated in `temp`: its own data dir, no config file, no
/// color, and the platform reported offline so nothing touches the network.
pub fn backhaul(temp: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("backhaul");
    cmd.env("BACKHAUL_DATA_DIR", temp.path().join("data"))
        .env("BACKHAUL_CONFIG", temp.path().join("missing.toml"))
        .env("NO_COLOR", "1")
        .env_remove("COLOR")
        .env_remove("RUST_LOG")
        .arg("--offline");
    cmd
}
