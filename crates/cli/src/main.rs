// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! aetherius - CLI for the aetheriusd game server daemon

mod client;
mod color;
mod commands;
mod daemon_process;
mod exit_error;
mod help;
mod output;
mod table;

use output::OutputFormat;

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "aetherius",
    version,
    disable_version_flag = true,
    about = "Supervise and talk to an aetheriusd game server daemon"
)]
struct Cli {
    /// Change to <dir> before doing anything
    #[arg(short = 'C', global = true, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Path to the daemon config file (default: aetherius.toml)
    #[arg(short = 'c', long = "config", global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the daemon and the game server, in the background
    Start,
    /// Game server lifecycle: start, stop, restart, status
    Server(commands::server::ServerArgs),
    /// Open a persistent console session
    Console,
    /// Send one command to the running game server
    Cmd {
        /// Command text. Prefixed with `/` automatically unless you supply
        /// your own `/`, `$`, or `!` prefix.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Component loader management
    Component(commands::component::ComponentArgs),
    /// Daemon configuration
    Config(commands::config::ConfigArgs),
    /// Daemon info, health, and log inspection
    System(commands::system::SystemArgs),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let code = e.downcast_ref::<exit_error::ExitError>().map_or(1, |c| c.code);
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(code);
    }
}

async fn run() -> Result<()> {
    let matches = cli_command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir)?;
    }

    let config_path = commands::config_path(cli.config.as_deref());
    let format = cli.output;

    match cli.command {
        None => {
            help::print_help(cli_command());
            Ok(())
        }
        Some(Commands::Start) => {
            commands::server::run(
                commands::server::ServerArgs { command: commands::server::ServerCommand::Start },
                &config_path,
            )
            .await
        }
        Some(Commands::Server(args)) => commands::server::run(args, &config_path).await,
        Some(Commands::Console) => commands::console::run_console(&config_path).await,
        Some(Commands::Cmd { text }) => {
            commands::console::run_cmd(&config_path, &text.join(" ")).await
        }
        Some(Commands::Component(args)) => commands::component::run(args, &config_path).await,
        Some(Commands::Config(args)) => commands::config::run(args, &config_path),
        Some(Commands::System(args)) => commands::system::run(args, &config_path, format).await,
    }
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, we skip
/// the "Caused by" chain to avoid noisy duplicate output (common when
/// thiserror variants use `#[error("... {0}")]` with `#[from]`).
/// Otherwise we render the full chain so context isn't lost.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err.chain().skip(1).all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

fn cli_command() -> clap::Command {
    Cli::command()
        .help_template(help::template())
        .before_help(help::commands())
        .after_help(help::after_help())
        .styles(help::styles())
        .arg(
            clap::Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .action(clap::ArgAction::Version)
                .help("Print version"),
        )
}

/// Walk a sequence of subcommand names down from the root command, used by
/// tests that need a specific subcommand's `clap::Command` in isolation.
#[cfg(test)]
fn find_subcommand(mut cmd: clap::Command, path: &[&str]) -> clap::Command {
    for name in path {
        cmd = cmd
            .find_subcommand(name)
            .unwrap_or_else(|| panic!("no such subcommand: {name}"))
            .clone();
    }
    cmd
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
