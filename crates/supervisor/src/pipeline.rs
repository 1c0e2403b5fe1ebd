// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client-side half of the named-pipe command bridge: write one command
//! line into a running supervisor's FIFO from an unrelated process.

use std::io::Write;
use std::path::Path;

pub fn submit_via_fifo(fifo_path: &Path, text: &str) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new().write(true).open(fifo_path)?;
    writeln!(file, "{}", text.trim())
}
