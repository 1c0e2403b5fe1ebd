// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-effort process introspection for the supervisor's `metrics()` call
//! and for adoption's "does this pid look like a game server" heuristic.

use sysinfo::{Pid, System};

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessMetrics {
    pub cpu_percent: f32,
    pub memory_mb: f64,
    pub thread_count: usize,
}

fn refreshed_system() -> System {
    let mut system = System::new_all();
    system.refresh_all();
    system
}

/// Returns `None` if the pid no longer exists — the process is gone, which
/// is a normal outcome, not an error.
pub fn snapshot(pid: u32) -> Option<ProcessMetrics> {
    let system = refreshed_system();
    let process = system.process(Pid::from_u32(pid as usize))?;
    Some(ProcessMetrics {
        cpu_percent: process.cpu_usage(),
        memory_mb: process.memory() as f64 / (1024.0 * 1024.0),
        thread_count: thread_count(pid),
    })
}

/// Linux exposes thread count directly via `/proc/<pid>/status`; sysinfo
/// does not surface it uniformly across platforms, so read it ourselves on
/// the platform that matters for a game-server host and fall back to 1.
#[cfg(target_os = "linux")]
fn thread_count(pid: u32) -> usize {
    let Ok(text) = std::fs::read_to_string(format!("/proc/{pid}/status")) else {
        return 1;
    };
    text.lines()
        .find_map(|line| line.strip_prefix("Threads:"))
        .and_then(|rest| rest.trim().parse().ok())
        .unwrap_or(1)
}

#[cfg(not(target_os = "linux"))]
fn thread_count(_pid: u32) -> usize {
    1
}

/// Heuristic used by adoption: does this pid look like a game server, i.e.
/// a `java` process whose command line ends in a `.jar` argument?
pub fn looks_like_game_server(pid: u32) -> bool {
    let system = refreshed_system();
    let Some(process) = system.process(Pid::from_u32(pid as usize)) else {
        return false;
    };
    let name = process.name().to_string_lossy().to_ascii_lowercase();
    if !name.contains("java") {
        return false;
    }
    process
        .cmd()
        .iter()
        .any(|arg| arg.to_string_lossy().ends_with(".jar"))
}

#[cfg(test)]
#[path = "process_metrics_tests.rs"]
mod tests;
