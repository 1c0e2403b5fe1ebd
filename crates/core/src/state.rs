// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shape of the persistent-state JSON file: the supervisor's only durable
//! record of "a game server process believed to be alive".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistentState {
    pub pid: u32,
    pub start_time: DateTime<Utc>,
    pub jar_path: String,
    pub working_directory: String,
}

impl PersistentState {
    pub fn new(pid: u32, jar_path: impl Into<String>, working_directory: impl Into<String>) -> Self {
        Self {
            pid,
            start_time: Utc::now(),
            jar_path: jar_path.into(),
            working_directory: working_directory.into(),
        }
    }
}
