// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon process management utilities.
//!
//! Functions for starting, stopping, and monitoring the `aetheriusd` process.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use crate::client::{poll_interval, timeout_exit, ClientError};

/// Start the daemon in the background from the given directory, returning
/// its child process handle. `config_path` is passed through `AETHERIUS_CONFIG`.
pub fn start_daemon_background(
    server_dir: &Path,
    config_path: &Path,
) -> Result<std::process::Child, ClientError> {
    let binary = find_aetheriusd_binary();

    Command::new(&binary)
        .current_dir(server_dir)
        .env("AETHERIUS_CONFIG", config_path)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| ClientError::DaemonStartFailed(e.to_string()))
}

/// Stop the daemon by PID, using SIGTERM then SIGKILL if it won't quit.
pub async fn stop_daemon(lock_path: &Path) {
    if let Some(pid) = read_lock_pid(lock_path) {
        kill_signal("-15", pid);

        let timeout = timeout_exit();
        let start = Instant::now();
        while start.elapsed() < timeout && process_exists(pid) {
            tokio::time::sleep(poll_interval()).await;
        }

        if process_exists(pid) {
            kill_signal("-9", pid);
        }
    }
    let _ = std::fs::remove_file(lock_path);
}

/// Wait for a process to exit.
pub async fn wait_for_exit(pid: u32, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if !process_exists(pid) {
            return true;
        }
        tokio::time::sleep(poll_interval()).await;
    }
    false
}

/// Locate the `aetheriusd` binary: a sibling of the running CLI binary, or
/// whatever `$PATH` resolves.
fn find_aetheriusd_binary() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("aetheriusd");
            if sibling.exists() {
                return sibling;
            }
        }
    }
    PathBuf::from("aetheriusd")
}

fn read_lock_pid(lock_path: &Path) -> Option<u32> {
    std::fs::read_to_string(lock_path)
        .ok()?
        .trim()
        .parse()
        .ok()
}

fn kill_signal(signal: &str, pid: u32) -> bool {
    Command::new("kill")
        .args([signal, &pid.to_string()])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Check if a process with the given PID exists.
pub fn process_exists(pid: u32) -> bool {
    kill_signal("-0", pid)
}

#[cfg(test)]
#[path = "daemon_process_tests.rs"]
mod tests;
