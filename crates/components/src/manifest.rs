// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reads `component.yaml`/`component.json`, filters it to the recognised
//! schema, and coerces the legacy `dependencies: {core_version, <name>}`
//! map shape into separate engine-version and dependency-name fields.

use crate::errors::ComponentError;
use aetherius_core::ComponentInfo;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawManifest {
    name: Option<String>,
    display_name: Option<String>,
    description: Option<String>,
    version: Option<String>,
    author: Option<String>,
    #[serde(default)]
    website: String,
    #[serde(default)]
    dependencies: Value,
    #[serde(default)]
    soft_dependencies: Vec<String>,
    aetherius_version: Option<String>,
    #[serde(default = "default_category")]
    category: String,
    #[serde(default)]
    permissions: Vec<String>,
    #[serde(default)]
    config_schema: HashMap<String, Value>,
    #[serde(default)]
    default_config: HashMap<String, Value>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default = "default_license")]
    license: String,
    #[serde(default)]
    min_ram: u64,
    #[serde(default)]
    load_order: i64,
    #[serde(default)]
    provides_web_interface: bool,
    #[serde(default)]
    web_routes: Vec<String>,
    #[serde(default)]
    api_endpoints: Vec<String>,
}

fn default_category() -> String {
    "general".to_string()
}

fn default_license() -> String {
    "MIT".to_string()
}

/// Read and filter the manifest in `component_dir`, preferring
/// `component.yaml` over `component.json` when both exist.
pub fn load_manifest(component_dir: &Path) -> Result<ComponentInfo, ComponentError> {
    let yaml_path = component_dir.join("component.yaml");
    let json_path = component_dir.join("component.json");
    let (path, text) = if yaml_path.exists() {
        let text = std::fs::read_to_string(&yaml_path)
            .map_err(|source| ComponentError::Io { path: yaml_path.clone(), source })?;
        (yaml_path, text)
    } else {
        let text = std::fs::read_to_string(&json_path)
            .map_err(|source| ComponentError::Io { path: json_path.clone(), source })?;
        (json_path, text)
    };

    let raw: RawManifest = if path.extension().and_then(|e| e.to_str()) == Some("yaml") {
        serde_yaml::from_str(&text).map_err(|e| ComponentError::ManifestParse {
            path: path.clone(),
            source: e.to_string(),
        })?
    } else {
        serde_json::from_str(&text).map_err(|e| ComponentError::ManifestParse {
            path: path.clone(),
            source: e.to_string(),
        })?
    };

    from_raw(raw)
}

fn from_raw(raw: RawManifest) -> Result<ComponentInfo, ComponentError> {
    let name = raw.name.unwrap_or_default();
    let (dependencies, aetherius_version) =
        coerce_dependencies(raw.dependencies, raw.aetherius_version.unwrap_or_else(default_engine_version));

    let info = ComponentInfo {
        name: name.clone(),
        display_name: raw.display_name.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        version: raw.version.unwrap_or_default(),
        author: raw.author.unwrap_or_default(),
        website: raw.website,
        dependencies,
        soft_dependencies: raw.soft_dependencies,
        aetherius_version,
        category: raw.category,
        permissions: raw.permissions,
        config_schema: raw.config_schema,
        default_config: raw.default_config,
        tags: raw.tags,
        license: raw.license,
        min_ram: raw.min_ram,
        load_order: raw.load_order,
        provides_web_interface: raw.provides_web_interface,
        web_routes: raw.web_routes,
        api_endpoints: raw.api_endpoints,
    };

    info.validate().map_err(|reason| ComponentError::InvalidManifest { name, reason })?;
    Ok(info)
}

fn default_engine_version() -> String {
    ">=1.0.0".to_string()
}

/// `dependencies` may be a plain list of component names, or a legacy map
/// of `{core_version: "...", <name>: "<version constraint>"}`. Either way
/// the `core_version` entry (if present) wins over an explicit
/// `aetherius_version` key, and every other map key becomes a hard
/// dependency.
fn coerce_dependencies(value: Value, aetherius_version: String) -> (Vec<String>, String) {
    match value {
        Value::Array(items) => {
            let deps = items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();
            (deps, aetherius_version)
        }
        Value::Object(map) => {
            let mut deps = Vec::with_capacity(map.len());
            let mut core_version = aetherius_version;
            for (key, val) in map {
                if key == "core_version" {
                    if let Some(s) = val.as_str() {
                        core_version = s.to_string();
                    }
                } else {
                    deps.push(key);
                }
            }
            (deps, core_version)
        }
        _ => (Vec::new(), aetherius_version),
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
