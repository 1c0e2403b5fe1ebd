// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration, loaded once at startup from a TOML file. Every
//! field is defaulted so a missing or partial file is always valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Directory the game server runs in; also where `pending/`, `completed/`,
    /// `.aetherius_state.json`, and `components/` live.
    pub server_dir: PathBuf,
    /// Path to the server jar, relative to `server_dir` unless absolute.
    pub jar_path: String,
    /// Extra JVM/launch arguments appended after the jar.
    pub launch_args: Vec<String>,
    /// Path of the Unix-domain socket the daemon listens on.
    pub socket_path: PathBuf,
    /// Prefix used to build the per-pid FIFO bridge path (`/tmp/<prefix>_<pid>.pipe`).
    pub fifo_prefix: String,
    /// Regex matched against stdout to detect "server is ready".
    pub ready_pattern: String,
    /// Grace period for a cooperative stop before escalating to a signal/kill.
    pub stop_grace_secs: u64,
    /// Further grace period after the OS signal before a forced kill.
    pub kill_grace_secs: u64,
    /// Whether the process monitor attempts a restart after `ServerCrashed`.
    pub auto_restart: bool,
    /// Command-queue poll interval, in milliseconds.
    pub queue_poll_interval_ms: u64,
    /// Age after which pending/completed queue files are garbage collected.
    pub queue_gc_age_secs: u64,
    /// Output-capture window used by the in-process `execute_command_with_result` path.
    pub in_process_capture_window_secs: f64,
    /// Output-capture window used by the cross-process queue processor.
    pub queue_capture_window_secs: f64,
    /// Safety-net expiry for any capture regardless of path.
    pub capture_max_age_secs: u64,
    /// Startup timeout for out-of-process components awaiting the READY marker.
    pub component_startup_timeout_secs: u64,
    /// `RUST_LOG`-style filter string; empty defers to the `RUST_LOG` env var.
    pub log_filter: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            server_dir: PathBuf::from("."),
            jar_path: "server.jar".to_string(),
            launch_args: Vec::new(),
            socket_path: PathBuf::from("/tmp/aetherius.sock"),
            fifo_prefix: "aetherius_server".to_string(),
            ready_pattern: r#"Done \(([\d.]+)s\)"#.to_string(),
            stop_grace_secs: 30,
            kill_grace_secs: 10,
            auto_restart: false,
            queue_poll_interval_ms: 500,
            queue_gc_age_secs: 300,
            in_process_capture_window_secs: 2.0,
            queue_capture_window_secs: 1.0,
            capture_max_age_secs: 30,
            component_startup_timeout_secs: 60,
            log_filter: String::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config file {path}: {source}")]
    Read { path: PathBuf, #[source] source: std::io::Error },
    #[error("parsing config file {path}: {source}")]
    Parse { path: PathBuf, #[source] source: toml::de::Error },
    #[error("serializing config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl DaemonConfig {
    /// Load from `path` if it exists; otherwise return the default config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn components_dir(&self) -> PathBuf {
        self.server_dir.join("components")
    }

    pub fn pending_dir(&self) -> PathBuf {
        self.server_dir.join("pending")
    }

    pub fn completed_dir(&self) -> PathBuf {
        self.server_dir.join("completed")
    }

    pub fn state_file(&self) -> PathBuf {
        self.server_dir.join(".aetherius_state.json")
    }

    pub fn jar_full_path(&self) -> PathBuf {
        let p = PathBuf::from(&self.jar_path);
        if p.is_absolute() {
            p
        } else {
            self.server_dir.join(p)
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
