// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Domain events fired by the supervisor, parser, and component loader.
//!
//! Events do not form a real inheritance chain the way the original
//! dynamically-typed event classes did; [`EventKind::family`] reconstructs the
//! same fan-out lattice (concrete type -> family -> root) so the event bus can
//! dispatch to listeners registered at any of those levels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Priority level controlling listener invocation order within one event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventPriority {
    Lowest,
    Low,
    Normal,
    High,
    Highest,
}

impl Default for EventPriority {
    fn default() -> Self {
        EventPriority::Normal
    }
}

/// The family an event's concrete type belongs to. Listeners may target a
/// whole family instead of one concrete kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventFamily {
    ServerLifecycle,
    Player,
    System,
    Performance,
    Error,
    Component,
}

/// Discriminant for every concrete event variant, used as a map key by the
/// bus and recorded in history without needing to hold the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    ServerStarting,
    ServerStarted,
    ServerStopping,
    ServerStopped,
    ServerCrashed,
    ServerLog,
    ServerStateChanged,
    PlayerJoin,
    PlayerLeave,
    PlayerChat,
    PlayerDeath,
    PlayerAdvancement,
    CoreReady,
    LogLine,
    UnknownLog,
    TickTime,
    LagSpike,
    PluginError,
    ConfigurationError,
    ComponentLoaded,
    ComponentEnabled,
    ComponentDisabled,
    ComponentFailed,
}

impl EventKind {
    /// The family this concrete kind belongs to, per the original lattice.
    pub fn family(self) -> EventFamily {
        use EventKind::*;
        match self {
            ServerStarting | ServerStarted | ServerStopping | ServerStopped | ServerCrashed
            | ServerLog | ServerStateChanged => EventFamily::ServerLifecycle,
            PlayerJoin | PlayerLeave | PlayerChat | PlayerDeath | PlayerAdvancement => {
                EventFamily::Player
            }
            CoreReady | LogLine | UnknownLog => EventFamily::System,
            TickTime | LagSpike => EventFamily::Performance,
            PluginError | ConfigurationError => EventFamily::Error,
            ComponentLoaded | ComponentEnabled | ComponentDisabled | ComponentFailed => {
                EventFamily::Component
            }
        }
    }

    pub fn name(self) -> &'static str {
        use EventKind::*;
        match self {
            ServerStarting => "server_starting",
            ServerStarted => "server_started",
            ServerStopping => "server_stopping",
            ServerStopped => "server_stopped",
            ServerCrashed => "server_crash",
            ServerLog => "server_log",
            ServerStateChanged => "server_state_changed",
            PlayerJoin => "player_join",
            PlayerLeave => "player_leave",
            PlayerChat => "player_chat",
            PlayerDeath => "player_death",
            PlayerAdvancement => "player_advancement",
            CoreReady => "core_ready",
            LogLine => "log_line",
            UnknownLog => "unknown_log",
            TickTime => "tick_time",
            LagSpike => "lag_spike",
            PluginError => "plugin_error",
            ConfigurationError => "configuration_error",
            ComponentLoaded => "component_loaded",
            ComponentEnabled => "component_enabled",
            ComponentDisabled => "component_disabled",
            ComponentFailed => "component_failed",
        }
    }
}

/// The five-state process lifecycle, carried by [`Event::ServerStateChanged`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerState {
    Stopped,
    Starting,
    Running,
    Stopping,
    Crashed,
}

impl std::fmt::Display for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ServerState::Stopped => "stopped",
            ServerState::Starting => "starting",
            ServerState::Running => "running",
            ServerState::Stopping => "stopping",
            ServerState::Crashed => "crashed",
        };
        write!(f, "{s}")
    }
}

/// One concrete domain event. Tagged by `type` on the wire, matching the
/// naming the original event registry used (`server_started`, `player_join`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "server_starting")]
    ServerStarting { command: Vec<String>, working_directory: String },
    #[serde(rename = "server_started")]
    ServerStarted { pid: u32, startup_time: f64 },
    #[serde(rename = "server_stopping")]
    ServerStopping { reason: String, force: bool },
    #[serde(rename = "server_stopped")]
    ServerStopped { exit_code: i32, uptime: f64 },
    #[serde(rename = "server_crash")]
    ServerCrashed { exit_code: i32, error_output: String, will_restart: bool },
    #[serde(rename = "server_log")]
    ServerLog { line: String, level: String, message: String, log_timestamp: Option<DateTime<Utc>> },
    #[serde(rename = "server_state_changed")]
    ServerStateChanged { old_state: ServerState, new_state: ServerState, reason: Option<String> },

    #[serde(rename = "player_join")]
    PlayerJoin { player_name: String, player_uuid: Option<String>, ip_address: Option<String> },
    #[serde(rename = "player_leave")]
    PlayerLeave { player_name: String, player_uuid: Option<String>, leave_reason: Option<String> },
    #[serde(rename = "player_chat")]
    PlayerChat { player_name: String, message: String, channel: String },
    #[serde(rename = "player_death")]
    PlayerDeath { player_name: String, death_message: String, killer: Option<String> },
    #[serde(rename = "player_advancement")]
    PlayerAdvancement { player_name: String, advancement: String, advancement_title: String },

    #[serde(rename = "core_ready")]
    CoreReady { components_loaded: u32, plugins_loaded: u32 },
    #[serde(rename = "log_line")]
    LogLine { raw: String, level: String, log_timestamp: Option<DateTime<Utc>>, message: String },
    #[serde(rename = "unknown_log")]
    UnknownLog { raw_line: String, attempted_patterns: Vec<String> },

    #[serde(rename = "tick_time")]
    TickTime { tick_time: f64, tps: f64, warning_threshold: f64 },
    #[serde(rename = "lag_spike")]
    LagSpike { duration: f64, severity: String },

    #[serde(rename = "plugin_error")]
    PluginError { error_message: String, plugin_name: String, error_type: String },
    #[serde(rename = "configuration_error")]
    ConfigurationError { error_message: String, config_file: String, line_number: Option<u32> },

    #[serde(rename = "component_loaded")]
    ComponentLoaded { name: String, version: String },
    #[serde(rename = "component_enabled")]
    ComponentEnabled { name: String },
    #[serde(rename = "component_disabled")]
    ComponentDisabled { name: String },
    #[serde(rename = "component_failed")]
    ComponentFailed { name: String, reason: String },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        use Event::*;
        match self {
            ServerStarting { .. } => EventKind::ServerStarting,
            ServerStarted { .. } => EventKind::ServerStarted,
            ServerStopping { .. } => EventKind::ServerStopping,
            ServerStopped { .. } => EventKind::ServerStopped,
            ServerCrashed { .. } => EventKind::ServerCrashed,
            ServerLog { .. } => EventKind::ServerLog,
            ServerStateChanged { .. } => EventKind::ServerStateChanged,
            PlayerJoin { .. } => EventKind::PlayerJoin,
            PlayerLeave { .. } => EventKind::PlayerLeave,
            PlayerChat { .. } => EventKind::PlayerChat,
            PlayerDeath { .. } => EventKind::PlayerDeath,
            PlayerAdvancement { .. } => EventKind::PlayerAdvancement,
            CoreReady { .. } => EventKind::CoreReady,
            LogLine { .. } => EventKind::LogLine,
            UnknownLog { .. } => EventKind::UnknownLog,
            TickTime { .. } => EventKind::TickTime,
            LagSpike { .. } => EventKind::LagSpike,
            PluginError { .. } => EventKind::PluginError,
            ConfigurationError { .. } => EventKind::ConfigurationError,
            ComponentLoaded { .. } => EventKind::ComponentLoaded,
            ComponentEnabled { .. } => EventKind::ComponentEnabled,
            ComponentDisabled { .. } => EventKind::ComponentDisabled,
            ComponentFailed { .. } => EventKind::ComponentFailed,
        }
    }
}

/// Wraps a concrete [`Event`] with the bookkeeping fields every event carried
/// in the original base class: a creation timestamp and a cancellation flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub timestamp: DateTime<Utc>,
    pub cancelled: bool,
    #[serde(flatten)]
    pub event: Event,
}

impl Envelope {
    pub fn new(event: Event) -> Self {
        Self { timestamp: Utc::now(), cancelled: false, event }
    }

    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// The set of event kinds pushed live to web-style subscribers by default.
pub const REALTIME_KINDS: &[EventKind] = &[
    EventKind::ServerLog,
    EventKind::PlayerJoin,
    EventKind::PlayerLeave,
    EventKind::PlayerChat,
    EventKind::ServerStateChanged,
];

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
