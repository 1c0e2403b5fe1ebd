// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    #[error("server jar not found at {0}")]
    JarNotFound(PathBuf),
    #[error("cannot {action} from state {state}")]
    InvalidTransition { action: &'static str, state: &'static str },
    #[error("server is not running")]
    NotRunning,
    #[error("stdin pipe is broken")]
    BrokenPipe,
    #[error("spawning server process: {0}")]
    Spawn(#[source] std::io::Error),
    #[error(transparent)]
    State(#[from] aetherius_storage::StateError),
    #[error(transparent)]
    Queue(#[from] aetherius_storage::QueueError),
}
