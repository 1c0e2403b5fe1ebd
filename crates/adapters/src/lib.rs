// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! External-I/O adapters: subprocess timeouts, process introspection, and
//! the POSIX named-pipe command bridge.

pub mod fifo;
pub mod process_metrics;
pub mod subprocess;

pub use fifo::{bridge_path, FifoError};
pub use process_metrics::{looks_like_game_server, snapshot, ProcessMetrics};
pub use subprocess::run_with_timeout;
