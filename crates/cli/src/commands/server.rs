// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `aetherius server` — start, stop, restart, and inspect the daemon and the
//! game server it supervises.

use std::path::Path;
use std::time::Duration;

use clap::{Args, Subcommand};

use crate::client::DaemonClient;
use crate::daemon_process;
use crate::exit_error::ExitError;
use aetherius_daemon::protocol::ServerMessage;

#[derive(Args)]
pub struct ServerArgs {
    #[command(subcommand)]
    pub command: ServerCommand,
}

#[derive(Subcommand)]
pub enum ServerCommand {
    /// Start the daemon if it isn't already running.
    Start,
    /// Stop the daemon and the game server it owns.
    Stop,
    /// Stop then start the daemon.
    Restart,
    /// Report whether the daemon and game server are running.
    Status,
}

pub async fn run(args: ServerArgs, config_path: &Path) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let client = DaemonClient::new(&config.socket_path);

    match args.command {
        ServerCommand::Start => {
            if client.is_reachable() {
                println!("daemon is already running");
                return Ok(());
            }
            daemon_process::start_daemon_background(&config.server_dir, config_path)?;
            wait_until_reachable(&client).await?;
            println!("daemon started; socket {}", config.socket_path.display());
        }
        ServerCommand::Stop => {
            if !client.is_reachable() {
                println!("daemon is not running");
                return Ok(());
            }
            let _ = client.send_command("!quit").await;
            daemon_process::stop_daemon(&super::lock_path(&config)).await;
            println!("daemon stopped");
        }
        ServerCommand::Restart => {
            if client.is_reachable() {
                let _ = client.send_command("!quit").await;
                daemon_process::stop_daemon(&super::lock_path(&config)).await;
            }
            daemon_process::start_daemon_background(&config.server_dir, config_path)?;
            wait_until_reachable(&client).await?;
            println!("daemon restarted");
        }
        ServerCommand::Status => {
            if !client.is_reachable() {
                println!("daemon: not running");
                return Ok(());
            }
            match client.send_command("!status").await? {
                ServerMessage::Response { success, output, error } => {
                    if success {
                        println!("{output}");
                    } else {
                        return Err(ExitError::new(1, error));
                    }
                }
                ServerMessage::Log { .. } => {}
            }
        }
    }
    Ok(())
}

async fn wait_until_reachable(client: &DaemonClient) -> anyhow::Result<()> {
    wait_until_reachable_within(client, Duration::from_secs(10)).await
}

async fn wait_until_reachable_within(client: &DaemonClient, deadline: Duration) -> anyhow::Result<()> {
    let start = std::time::Instant::now();
    while start.elapsed() < deadline {
        if client.is_reachable() {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    Err(ExitError::new(1, "timed out waiting for the daemon to come up"))
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
