// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    #[error("component {0} not found")]
    NotFound(String),
    #[error("component {name} manifest rejected: {reason}")]
    InvalidManifest { name: String, reason: String },
    #[error("circular dependency involving component {0}")]
    CircularDependency(String),
    #[error("component {0} is already loaded")]
    AlreadyLoaded(String),
    #[error("component {0} is not loaded")]
    NotLoaded(String),
    #[error("component {0} is not enabled")]
    NotEnabled(String),
    #[error("missing hard dependency {dependency} for component {name}")]
    MissingDependency { name: String, dependency: String },
    #[error("reading {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("parsing manifest at {path}: {source}")]
    ManifestParse { path: PathBuf, source: String },
    #[error("component {name} start_component script exited with status {code}")]
    StartupFailed { name: String, code: i32 },
}
