// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Data types for the cross-process command pipeline. File I/O for these
//! lives in `aetherius-storage`; this crate only owns the shapes.

use crate::id::CommandId;
use serde::{Deserialize, Serialize};

/// Status of a [`CommandRequest`] as it moves through `pending/` -> `completed/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandStatus {
    Pending,
    Completed,
    Timeout,
}

/// One `pending/<id>.json` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingCommand {
    pub id: CommandId,
    pub command: String,
    pub timestamp: f64,
    pub timeout: f64,
    pub status: CommandStatus,
}

impl PendingCommand {
    pub fn new(id: CommandId, command: impl Into<String>, timestamp: f64, timeout: f64) -> Self {
        Self { id, command: command.into(), timestamp, timeout, status: CommandStatus::Pending }
    }
}

/// One `completed/<id>.json` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedCommand {
    pub id: CommandId,
    pub status: CommandStatus,
    pub success: bool,
    pub timestamp: f64,
    pub error: Option<String>,
    pub output: Option<String>,
}

/// In-memory record of a command submitted through any of the three tiers,
/// returned to callers once a result is known.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub id: CommandId,
    pub success: bool,
    pub output: Option<String>,
    pub error: Option<String>,
    pub execution_time: f64,
}

impl CommandResult {
    pub fn timeout(id: CommandId) -> Self {
        Self { id, success: false, output: None, error: Some("timeout".into()), execution_time: 0.0 }
    }
}

/// A window during which log lines following a command submission are
/// collected as that command's synthetic reply.
#[derive(Debug, Clone)]
pub struct CommandOutputCapture {
    pub command_id: CommandId,
    pub base_verb: String,
    pub started_at: std::time::Instant,
    pub lines: Vec<String>,
}

impl CommandOutputCapture {
    pub fn new(command_id: CommandId, command_text: &str) -> Self {
        let base_verb = command_text
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        Self { command_id, base_verb, started_at: std::time::Instant::now(), lines: Vec::new() }
    }

    pub fn add_line(&mut self, line: String) {
        self.lines.push(line);
    }

    pub fn output(&self) -> Option<String> {
        let joined = self.lines.join("\n");
        if joined.trim().is_empty() {
            None
        } else {
            Some(joined)
        }
    }

    pub fn is_expired(&self, max_age: std::time::Duration) -> bool {
        self.started_at.elapsed() > max_age
    }
}

pub const DEFAULT_CAPTURE_MAX_AGE_SECS: u64 = 30;
pub const DEFAULT_QUEUE_GC_AGE_SECS: u64 = 300;
pub const DEFAULT_QUEUE_POLL_INTERVAL_MS: u64 = 500;
