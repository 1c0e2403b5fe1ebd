// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scans `components/`, resolves load order, and runs each component's
//! `start_component` script out-of-process through its READY handshake.

use crate::errors::ComponentError;
use crate::graph::topological_order;
use crate::manifest::load_manifest;
use aetherius_core::{Component, ComponentInfo, ComponentState, Envelope, Event};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, Mutex};

struct Record {
    component: Component,
    config: HashMap<String, Value>,
    process: Option<Child>,
}

/// Scans, loads, and enables components found under a `components/` directory.
pub struct ComponentManager {
    components_dir: PathBuf,
    startup_timeout: Duration,
    events_tx: mpsc::UnboundedSender<Envelope>,
    records: Arc<Mutex<HashMap<String, Record>>>,
}

impl ComponentManager {
    pub fn new(
        components_dir: PathBuf,
        startup_timeout: Duration,
        events_tx: mpsc::UnboundedSender<Envelope>,
    ) -> Self {
        Self { components_dir, startup_timeout, events_tx, records: Arc::new(Mutex::new(HashMap::new())) }
    }

    fn fire(&self, event: Event) {
        let _ = self.events_tx.send(Envelope::new(event));
    }

    /// Discover every subdirectory carrying a manifest. Invalid manifests are
    /// logged and skipped rather than failing the whole scan.
    pub async fn scan(&self) -> Result<Vec<String>, ComponentError> {
        if !self.components_dir.exists() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(&self.components_dir)
            .map_err(|source| ComponentError::Io { path: self.components_dir.clone(), source })?;

        let mut found = Vec::new();
        let mut records = self.records.lock().await;
        for entry in entries.flatten() {
            let dir = entry.path();
            if !dir.is_dir() {
                continue;
            }
            let info = match load_manifest(&dir) {
                Ok(info) => info,
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "skipping component with invalid manifest");
                    continue;
                }
            };
            let name = info.name.clone();
            let config = merge_config(&dir, &info.default_config);
            records.insert(
                name.clone(),
                Record { component: Component::discovered(info, dir), config, process: None },
            );
            found.push(name);
        }
        Ok(found)
    }

    /// Transition a discovered component to `Loaded`. Requires every hard
    /// dependency to already be `Loaded` or `Enabled`.
    pub async fn load(&self, name: &str) -> Result<(), ComponentError> {
        let mut records = self.records.lock().await;
        let deps = {
            let record = records.get(name).ok_or_else(|| ComponentError::NotFound(name.to_string()))?;
            if matches!(record.component.state, ComponentState::Loaded | ComponentState::Enabled) {
                return Ok(());
            }
            record.component.info.dependencies.clone()
        };
        for dep in &deps {
            let loaded = records
                .get(dep)
                .map(|r| matches!(r.component.state, ComponentState::Loaded | ComponentState::Enabled))
                .unwrap_or(false);
            if !loaded {
                let record = records.get_mut(name).expect("checked above");
                record.component.mark_failed(format!("missing dependency {dep}"));
                return Err(ComponentError::MissingDependency { name: name.to_string(), dependency: dep.clone() });
            }
        }
        let record = records.get_mut(name).expect("checked above");
        record.component.state = ComponentState::Loaded;
        let version = record.component.info.version.clone();
        drop(records);
        self.fire(Event::ComponentLoaded { name: name.to_string(), version });
        Ok(())
    }

    /// Enable a loaded component: spawn its `start_component` script, if any,
    /// and wait for the READY handshake, a timeout, or a non-zero exit.
    pub async fn enable(&self, name: &str) -> Result<(), ComponentError> {
        let (dir, startup_script) = {
            let records = self.records.lock().await;
            let record = records.get(name).ok_or_else(|| ComponentError::NotFound(name.to_string()))?;
            if record.component.state != ComponentState::Loaded {
                return Err(ComponentError::NotLoaded(name.to_string()));
            }
            let script = script_path(&record.component.path);
            (record.component.path.clone(), script)
        };

        let Some(script) = startup_script else {
            let mut records = self.records.lock().await;
            records.get_mut(name).expect("checked above").component.state = ComponentState::Enabled;
            drop(records);
            self.fire(Event::ComponentEnabled { name: name.to_string() });
            return Ok(());
        };

        let mut cmd = Command::new(&script);
        cmd.current_dir(&dir)
            .env("AETHERIUS_COMPONENT_MODE", "1")
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| ComponentError::Io { path: script.clone(), source })?;
        let pid = child.id();
        let stdout = child.stdout.take().expect("stdout is piped");
        let stderr = child.stderr.take().expect("stderr is piped");

        let name_owned = name.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::info!(component = %name_owned, "{line}");
            }
        });

        let ready = wait_for_ready(stdout, &mut child, name, self.startup_timeout).await;

        let mut records = self.records.lock().await;
        let record = records.get_mut(name).expect("checked above");
        match ready {
            ReadyOutcome::Ready => {
                record.component.state = ComponentState::Enabled;
                record.component.child_pid = pid;
                record.process = Some(child);
                drop(records);
                self.fire(Event::ComponentEnabled { name: name.to_string() });
                Ok(())
            }
            ReadyOutcome::TimedOut => {
                tracing::warn!(component = %name, "start_component did not report READY within the startup timeout; leaving it running");
                record.component.state = ComponentState::Enabled;
                record.component.child_pid = pid;
                record.process = Some(child);
                drop(records);
                self.fire(Event::ComponentEnabled { name: name.to_string() });
                Ok(())
            }
            ReadyOutcome::Exited(code) => {
                record.component.mark_failed(format!("start_component exited with status {code}"));
                drop(records);
                self.fire(Event::ComponentFailed { name: name.to_string(), reason: format!("exit code {code}") });
                Err(ComponentError::StartupFailed { name: name.to_string(), code })
            }
        }
    }

    /// Disable an enabled component, killing its out-of-process script if any.
    pub async fn disable(&self, name: &str) -> Result<(), ComponentError> {
        let mut records = self.records.lock().await;
        let record = records.get_mut(name).ok_or_else(|| ComponentError::NotFound(name.to_string()))?;
        if record.component.state != ComponentState::Enabled {
            return Err(ComponentError::NotEnabled(name.to_string()));
        }
        if let Some(mut child) = record.process.take() {
            let _ = child.kill().await;
        }
        record.component.state = ComponentState::Disabled;
        record.component.child_pid = None;
        drop(records);
        self.fire(Event::ComponentDisabled { name: name.to_string() });
        Ok(())
    }

    /// Unload a disabled (or never-enabled) component, dropping its record.
    pub async fn unload(&self, name: &str) -> Result<(), ComponentError> {
        let mut records = self.records.lock().await;
        let record = records.get_mut(name).ok_or_else(|| ComponentError::NotFound(name.to_string()))?;
        if record.component.state == ComponentState::Enabled {
            return Err(ComponentError::NotEnabled(name.to_string()));
        }
        record.component.state = ComponentState::Unloaded;
        Ok(())
    }

    /// `disable (if enabled)` -> `unload` -> `load` -> `enable` (if it was
    /// enabled before the reload began).
    pub async fn reload(&self, name: &str) -> Result<(), ComponentError> {
        let was_enabled = {
            let records = self.records.lock().await;
            let record = records.get(name).ok_or_else(|| ComponentError::NotFound(name.to_string()))?;
            record.component.state == ComponentState::Enabled
        };
        if was_enabled {
            self.disable(name).await?;
        }
        self.unload(name).await?;
        {
            let mut records = self.records.lock().await;
            records.get_mut(name).expect("present").component.state = ComponentState::Discovered;
        }
        self.load(name).await?;
        if was_enabled {
            self.enable(name).await?;
        }
        Ok(())
    }

    /// Scan, then load and enable every discovered component in dependency
    /// order. A cyclic graph aborts the whole pass (zero loaded) rather than
    /// loading a partial, inconsistent set.
    pub async fn load_all(&self) -> Result<usize, ComponentError> {
        self.scan().await?;
        let infos: HashMap<String, ComponentInfo> = {
            let records = self.records.lock().await;
            records.iter().map(|(name, record)| (name.clone(), record.component.info.clone())).collect()
        };
        let order = match topological_order(&infos) {
            Ok(order) => order,
            Err(e) => {
                tracing::error!(error = %e, "component dependency graph is cyclic; loading nothing");
                return Ok(0);
            }
        };
        let mut loaded = 0;
        for name in order {
            if self.load(&name).await.is_ok() && self.enable(&name).await.is_ok() {
                loaded += 1;
            }
        }
        Ok(loaded)
    }

    pub async fn list(&self) -> Vec<(String, ComponentState)> {
        let records = self.records.lock().await;
        records.iter().map(|(name, r)| (name.clone(), r.component.state)).collect()
    }

    pub async fn info(&self, name: &str) -> Result<ComponentInfo, ComponentError> {
        let records = self.records.lock().await;
        records
            .get(name)
            .map(|r| r.component.info.clone())
            .ok_or_else(|| ComponentError::NotFound(name.to_string()))
    }

    pub async fn stats(&self) -> ComponentStats {
        let records = self.records.lock().await;
        let mut stats = ComponentStats::default();
        for record in records.values() {
            stats.total += 1;
            match record.component.state {
                ComponentState::Loaded => stats.loaded += 1,
                ComponentState::Enabled => stats.enabled += 1,
                ComponentState::Failed => stats.failed += 1,
                _ => {}
            }
        }
        stats
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ComponentStats {
    pub total: usize,
    pub loaded: usize,
    pub enabled: usize,
    pub failed: usize,
}

enum ReadyOutcome {
    Ready,
    TimedOut,
    Exited(i32),
}

async fn wait_for_ready(stdout: tokio::process::ChildStdout, child: &mut Child, name: &str, timeout: Duration) -> ReadyOutcome {
    let mut lines = BufReader::new(stdout).lines();
    let scan = async {
        while let Ok(Some(line)) = lines.next_line().await {
            tracing::info!(component = %name, "{line}");
            if line.trim() == "AETHERIUS_COMPONENT_STATUS: READY" {
                return ReadyOutcome::Ready;
            }
            if let Some(status) = line.strip_prefix("AETHERIUS_COMPONENT_STATUS: ") {
                if status != "READY" {
                    return ReadyOutcome::Exited(exit_code(child).await);
                }
            }
        }
        ReadyOutcome::Exited(exit_code(child).await)
    };
    match tokio::time::timeout(timeout, scan).await {
        Ok(outcome) => outcome,
        Err(_) => ReadyOutcome::TimedOut,
    }
}

/// Reap the child once its stdout has closed and report its real exit code,
/// falling back to -1 if it was killed by a signal instead of exiting.
async fn exit_code(child: &mut Child) -> i32 {
    match child.wait().await {
        Ok(status) => status.code().unwrap_or(-1),
        Err(_) => -1,
    }
}

fn script_path(component_dir: &std::path::Path) -> Option<PathBuf> {
    let candidate = component_dir.join("start_component");
    if candidate.exists() {
        Some(candidate)
    } else {
        None
    }
}

fn merge_config(component_dir: &std::path::Path, default_config: &HashMap<String, Value>) -> HashMap<String, Value> {
    let mut config = default_config.clone();
    let user_path = component_dir.join("config.yaml");
    let Ok(text) = std::fs::read_to_string(&user_path) else {
        return config;
    };
    match serde_yaml::from_str::<HashMap<String, Value>>(&text) {
        Ok(overrides) => {
            config.extend(overrides);
            config
        }
        Err(_) => {
            tracing::warn!(path = %user_path.display(), "failed to parse component config override");
            config
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
