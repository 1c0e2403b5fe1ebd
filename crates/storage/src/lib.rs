// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! File-backed persistence: the state file and the command queue
//! directories. No in-memory caching; every call hits the filesystem so
//! multiple processes stay consistent.

mod atomic;
mod queue;
mod state_store;

pub use atomic::epoch_secs;
pub use queue::{CommandQueue, CorruptFile, QueueError};
pub use state_store::{StateError, StateStore};
