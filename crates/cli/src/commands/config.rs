// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `aetherius config` — inspect and scaffold the daemon's TOML config file.
//! These subcommands never touch the daemon socket.

use std::path::Path;

use clap::{Args, Subcommand};

use aetherius_core::DaemonConfig;

use crate::exit_error::ExitError;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective config as TOML (defaults filled in).
    Show,
    /// Write a default config file, failing if one already exists.
    Init {
        /// Overwrite an existing config file.
        #[arg(long)]
        force: bool,
    },
    /// Load the config file and report whether it parses.
    Validate,
}

pub fn run(args: ConfigArgs, config_path: &Path) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = super::load_config(config_path)?;
            print!("{}", config.to_toml_string()?);
        }
        ConfigCommand::Init { force } => {
            if config_path.exists() && !force {
                return Err(ExitError::new(
                    1,
                    format!("{} already exists; pass --force to overwrite", config_path.display()),
                ));
            }
            let mut default = DaemonConfig::default();
            if let Ok(cwd) = std::env::current_dir() {
                default.server_dir = cwd;
            }
            if let Some(parent) = config_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(config_path, default.to_toml_string()?)?;
            println!("wrote {}", config_path.display());
        }
        ConfigCommand::Validate => {
            let config = super::load_config(config_path)?;
            if !config.jar_full_path().exists() {
                eprintln!(
                    "warning: jar path {} does not exist",
                    config.jar_full_path().display()
                );
            }
            println!("{} is valid", config_path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
