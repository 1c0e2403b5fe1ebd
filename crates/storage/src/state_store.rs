// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-file persistence for [`PersistentState`]: present iff the
//! supervisor believes a game-server process is alive.

use crate::atomic::write_atomic;
use aetherius_core::PersistentState;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("reading state file {path}: {source}")]
    Read { path: PathBuf, #[source] source: std::io::Error },
    #[error("writing state file {path}: {source}")]
    Write { path: PathBuf, #[source] source: std::io::Error },
    #[error("parsing state file {path}: {source}")]
    Parse { path: PathBuf, #[source] source: serde_json::Error },
    #[error("serializing state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Owns the single JSON file backing [`PersistentState`].
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `None` means no state file exists: no server is believed to be running.
    pub fn load(&self) -> Result<Option<PersistentState>, StateError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&self.path)
            .map_err(|source| StateError::Read { path: self.path.clone(), source })?;
        let state = serde_json::from_str(&text)
            .map_err(|source| StateError::Parse { path: self.path.clone(), source })?;
        Ok(Some(state))
    }

    pub fn save(&self, state: &PersistentState) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|source| StateError::Write { path: self.path.clone(), source })?;
        }
        let text = serde_json::to_string_pretty(state)?;
        write_atomic(&self.path, &text)
            .map_err(|source| StateError::Write { path: self.path.clone(), source })
    }

    /// Remove the file, if present. A clean `stop` calls this.
    pub fn clear(&self) -> Result<(), StateError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StateError::Write { path: self.path.clone(), source }),
        }
    }
}

#[cfg(test)]
#[path = "state_store_tests.rs"]
mod tests;
