// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed command queue: `pending/<id>.json` -> `completed/<id>.json`.
//! Any process may submit; exactly one supervisor process drains `pending/`.

use crate::atomic::{epoch_secs, write_atomic};
use aetherius_core::{CommandId, CommandStatus, CompletedCommand, PendingCommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("io error on {path}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },
    #[error("serializing command: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn io_err(path: &Path, source: std::io::Error) -> QueueError {
    QueueError::Io { path: path.to_path_buf(), source }
}

/// A pending-file that failed to parse; the caller should delete it and
/// move on rather than abort the whole polling pass.
pub struct CorruptFile {
    pub path: PathBuf,
    pub error: serde_json::Error,
}

pub struct CommandQueue {
    pending_dir: PathBuf,
    completed_dir: PathBuf,
}

impl CommandQueue {
    pub fn new(pending_dir: PathBuf, completed_dir: PathBuf) -> Result<Self, QueueError> {
        std::fs::create_dir_all(&pending_dir).map_err(|e| io_err(&pending_dir, e))?;
        std::fs::create_dir_all(&completed_dir).map_err(|e| io_err(&completed_dir, e))?;
        Ok(Self { pending_dir, completed_dir })
    }

    fn pending_path(&self, id: &CommandId) -> PathBuf {
        self.pending_dir.join(format!("{id}.json"))
    }

    fn completed_path(&self, id: &CommandId) -> PathBuf {
        self.completed_dir.join(format!("{id}.json"))
    }

    /// Atomically write a new pending-command file, returning its id.
    pub fn submit(&self, command: &str, timeout: f64) -> Result<CommandId, QueueError> {
        let id = CommandId::generate();
        let request = PendingCommand::new(id.clone(), command, epoch_secs(), timeout);
        let path = self.pending_path(&id);
        let text = serde_json::to_string(&request)?;
        write_atomic(&path, &text).map_err(|e| io_err(&path, e))?;
        Ok(id)
    }

    /// List every pending request. Files that fail to parse are reported as
    /// [`CorruptFile`] rather than aborting the scan; the caller (the
    /// processor) deletes them and logs, per the corrupt-file recovery policy.
    pub fn poll_pending(&self) -> Result<(Vec<PendingCommand>, Vec<CorruptFile>), QueueError> {
        let mut good = Vec::new();
        let mut bad = Vec::new();
        let entries = match std::fs::read_dir(&self.pending_dir) {
            Ok(entries) => entries,
            Err(e) => return Err(io_err(&self.pending_dir, e)),
        };
        for entry in entries {
            let entry = entry.map_err(|e| io_err(&self.pending_dir, e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let text = match std::fs::read_to_string(&path) {
                Ok(t) => t,
                Err(_) => continue,
            };
            match serde_json::from_str::<PendingCommand>(&text) {
                Ok(req) => good.push(req),
                Err(error) => bad.push(CorruptFile { path, error }),
            }
        }
        Ok((good, bad))
    }

    pub fn delete_pending(&self, id: &CommandId) -> Result<(), QueueError> {
        remove_if_present(&self.pending_path(id))
    }

    pub fn delete_corrupt(&self, file: &CorruptFile) -> Result<(), QueueError> {
        remove_if_present(&file.path)
    }

    /// Write the completed result and remove the matching pending file.
    pub fn complete(&self, result: CompletedCommand) -> Result<(), QueueError> {
        let path = self.completed_path(&result.id);
        let text = serde_json::to_string(&result)?;
        write_atomic(&path, &text).map_err(|e| io_err(&path, e))?;
        self.delete_pending(&result.id)
    }

    /// Non-blocking check: has `completed/<id>.json` appeared yet? If so,
    /// read it and delete it (consume-once semantics).
    pub fn take_completed(&self, id: &CommandId) -> Result<Option<CompletedCommand>, QueueError> {
        let path = self.completed_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        let result: CompletedCommand = serde_json::from_str(&text)?;
        remove_if_present(&path)?;
        Ok(Some(result))
    }

    pub fn timeout_result(id: CommandId) -> CompletedCommand {
        CompletedCommand {
            id,
            status: CommandStatus::Timeout,
            success: false,
            timestamp: epoch_secs(),
            error: Some("timeout".to_string()),
            output: None,
        }
    }

    /// Remove files older than `max_age` from both directories.
    pub fn gc(&self, max_age: Duration) -> Result<usize, QueueError> {
        let mut removed = 0;
        for dir in [&self.pending_dir, &self.completed_dir] {
            for entry in std::fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
                let entry = entry.map_err(|e| io_err(dir, e))?;
                let path = entry.path();
                let Ok(metadata) = entry.metadata() else { continue };
                let Ok(modified) = metadata.modified() else { continue };
                if modified.elapsed().unwrap_or_default() > max_age {
                    remove_if_present(&path)?;
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }
}

fn remove_if_present(path: &Path) -> Result<(), QueueError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(io_err(path, source)),
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
