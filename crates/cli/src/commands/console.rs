// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `aetherius console` / `aetherius cmd` — the two ways of talking to a
//! running daemon's persistent console socket.

use std::path::Path;

use aetherius_daemon::protocol::ServerMessage;

use crate::client::DaemonClient;
use crate::exit_error::ExitError;

/// Open an interactive console: lines typed at stdin become commands, and
/// everything the daemon sends back (log lines, responses) prints to stdout.
pub async fn run_console(config_path: &Path) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let client = DaemonClient::new(&config.socket_path);
    if !client.is_reachable() {
        return Err(ExitError::new(1, "daemon is not running"));
    }
    client.run_console().await?;
    Ok(())
}

/// Send one command and print its response, then disconnect.
pub async fn run_cmd(config_path: &Path, text: &str) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let client = DaemonClient::new(&config.socket_path);
    if !client.is_reachable() {
        return Err(ExitError::new(1, "daemon is not running"));
    }
    let prefixed = if text.starts_with(['/', '$', '!']) {
        text.to_string()
    } else {
        format!("/{text}")
    };
    match client.send_command(&prefixed).await? {
        ServerMessage::Response { success, output, error } => {
            if success {
                if !output.is_empty() {
                    println!("{output}");
                }
                Ok(())
            } else {
                Err(ExitError::new(1, error))
            }
        }
        ServerMessage::Log { .. } => Ok(()),
    }
}

#[cfg(test)]
#[path = "console_tests.rs"]
mod tests;
