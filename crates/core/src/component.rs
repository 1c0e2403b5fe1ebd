// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Component metadata and lifecycle state, shared between the manifest
//! parser, dependency resolver, and loader in `aetherius-components`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata discovered from one component's manifest (`component.yaml`/`.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInfo {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub version: String,
    pub author: String,
    #[serde(default)]
    pub website: String,

    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub soft_dependencies: Vec<String>,
    #[serde(default = "default_engine_version")]
    pub aetherius_version: String,

    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub permissions: Vec<String>,

    #[serde(default)]
    pub config_schema: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub default_config: HashMap<String, serde_json::Value>,

    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_license")]
    pub license: String,
    #[serde(default)]
    pub min_ram: u64,
    #[serde(default)]
    pub load_order: i64,

    #[serde(default)]
    pub provides_web_interface: bool,
    #[serde(default)]
    pub web_routes: Vec<String>,
    #[serde(default)]
    pub api_endpoints: Vec<String>,
}

fn default_engine_version() -> String {
    ">=1.0.0".to_string()
}

fn default_category() -> String {
    "general".to_string()
}

fn default_license() -> String {
    "MIT".to_string()
}

/// Required-field check matching the original manifest validation.
pub const REQUIRED_FIELDS: &[&str] = &["name", "display_name", "description", "version", "author"];

impl ComponentInfo {
    /// Mirrors the original `validate()`: every required field must be non-empty.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("missing required field: name".into());
        }
        if self.display_name.is_empty() {
            return Err("missing required field: display_name".into());
        }
        if self.description.is_empty() {
            return Err("missing required field: description".into());
        }
        if self.version.is_empty() {
            return Err("missing required field: version".into());
        }
        if self.author.is_empty() {
            return Err("missing required field: author".into());
        }
        Ok(())
    }
}

/// Lifecycle state of a loaded component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentState {
    Discovered,
    Loaded,
    Enabled,
    Disabled,
    Unloaded,
    Failed,
}

impl std::fmt::Display for ComponentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ComponentState::Discovered => "discovered",
            ComponentState::Loaded => "loaded",
            ComponentState::Enabled => "enabled",
            ComponentState::Disabled => "disabled",
            ComponentState::Unloaded => "unloaded",
            ComponentState::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Runtime record of one component tracked by the loader.
#[derive(Debug, Clone)]
pub struct Component {
    pub info: ComponentInfo,
    pub state: ComponentState,
    pub path: std::path::PathBuf,
    pub failure_reason: Option<String>,
    /// pid of the out-of-process child, if this component is running one.
    pub child_pid: Option<u32>,
}

impl Component {
    pub fn discovered(info: ComponentInfo, path: std::path::PathBuf) -> Self {
        Self { info, state: ComponentState::Discovered, path, failure_reason: None, child_pid: None }
    }

    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.state = ComponentState::Failed;
        self.failure_reason = Some(reason.into());
    }
}

#[cfg(test)]
#[path = "component_tests.rs"]
mod tests;
