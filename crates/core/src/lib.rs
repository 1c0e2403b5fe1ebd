// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! aetherius-core: shared data types for the supervisor, pipeline, event
//! bus, parser, component loader, and daemon.

pub mod component;
pub mod config;
pub mod events;
pub mod id;
pub mod pipeline;
pub mod state;
pub mod time_fmt;

pub use component::{Component, ComponentInfo, ComponentState};
pub use config::{ConfigError, DaemonConfig};
pub use events::{Envelope, Event, EventFamily, EventKind, EventPriority, ServerState, REALTIME_KINDS};
pub use id::{CommandId, IdGen, ShortId, UuidIdGen};
pub use pipeline::{
    CommandOutputCapture, CommandResult, CommandStatus, CompletedCommand, PendingCommand,
};
pub use state::PersistentState;
pub use time_fmt::{format_elapsed, format_elapsed_ms};
