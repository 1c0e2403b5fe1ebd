// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `aetherius system` — daemon version/path info, a health check, and log
//! inspection.

use std::path::Path;

use clap::{Args, Subcommand};

use crate::client::DaemonClient;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct SystemArgs {
    #[command(subcommand)]
    pub command: SystemCommand,
}

#[derive(Subcommand)]
pub enum SystemCommand {
    /// Print CLI version and resolved config/socket/log paths.
    Info,
    /// Check whether the daemon socket is reachable.
    Health,
    /// Show the daemon's log file.
    Logs {
        /// Stream new lines as they're appended.
        #[arg(long, short)]
        follow: bool,
    },
}

pub async fn run(args: SystemArgs, config_path: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    match args.command {
        SystemCommand::Info => {
            println!("aetherius {}", env!("CARGO_PKG_VERSION"));
            println!("config:  {}", config_path.display());
            println!("socket:  {}", config.socket_path.display());
            println!("server:  {}", config.server_dir.display());
        }
        SystemCommand::Health => {
            let client = DaemonClient::new(&config.socket_path);
            if client.is_reachable() {
                println!("daemon: reachable at {}", config.socket_path.display());
            } else {
                println!("daemon: unreachable");
            }
        }
        SystemCommand::Logs { follow } => {
            let log_path = config.server_dir.join("aetheriusd.log");
            let content = std::fs::read_to_string(&log_path).unwrap_or_default();
            output::display_log(&log_path, &content, follow, format, "daemon", "aetheriusd").await?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "system_tests.rs"]
mod tests;
