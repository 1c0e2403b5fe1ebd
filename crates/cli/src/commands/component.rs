// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `aetherius component` — inspect and manage components through the
//! running daemon's console socket.

use std::path::Path;

use clap::{Args, Subcommand};

use aetherius_daemon::protocol::ServerMessage;

use crate::client::DaemonClient;
use crate::exit_error::ExitError;

#[derive(Args)]
pub struct ComponentArgs {
    #[command(subcommand)]
    pub command: ComponentCommand,
}

#[derive(Subcommand)]
pub enum ComponentCommand {
    /// Discover components under the components directory without loading them.
    Scan,
    /// List every known component and its state.
    List,
    /// Load a component by name.
    Load { name: String },
    /// Enable a loaded component.
    Enable { name: String },
    /// Disable an enabled component.
    Disable { name: String },
    /// Unload then reload a component.
    Reload { name: String },
    /// Show manifest details for one component.
    Info { name: String },
    /// Show aggregate counts across all components.
    Stats,
}

pub async fn run(args: ComponentArgs, config_path: &Path) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let client = DaemonClient::new(&config.socket_path);
    if !client.is_reachable() {
        return Err(ExitError::new(1, "daemon is not running"));
    }

    let command = match args.command {
        ComponentCommand::Scan => "$scan".to_string(),
        ComponentCommand::List => "$list".to_string(),
        ComponentCommand::Load { name } => format!("$load {name}"),
        ComponentCommand::Enable { name } => format!("$enable {name}"),
        ComponentCommand::Disable { name } => format!("$disable {name}"),
        ComponentCommand::Reload { name } => format!("$reload {name}"),
        ComponentCommand::Info { name } => format!("$info {name}"),
        ComponentCommand::Stats => "$stats".to_string(),
    };

    match client.send_command(&command).await? {
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
#[path = "component_tests.rs"]
mod tests;
