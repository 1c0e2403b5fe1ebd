// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod component;
pub mod config;
pub mod console;
pub mod server;
pub mod system;

use std::path::{Path, PathBuf};

use aetherius_core::DaemonConfig;

/// Resolve the config file path: `--config` if given, else `aetherius.toml`
/// in the current directory.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("aetherius.toml"))
}

pub fn load_config(path: &Path) -> anyhow::Result<DaemonConfig> {
    Ok(DaemonConfig::load(path)?)
}

pub fn lock_path(config: &DaemonConfig) -> PathBuf {
    config.server_dir.join(".aetheriusd.lock")
}
