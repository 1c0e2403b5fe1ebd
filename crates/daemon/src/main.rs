// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! aetheriusd: background process that owns the game server, the component
//! loader, and the persistent console socket.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use aetherius_components::ComponentManager;
use aetherius_core::DaemonConfig;
use aetherius_daemon::event_bus::EventBus;
use aetherius_daemon::listener::{self, ConsoleContext};
use aetherius_storage::{CommandQueue, StateStore};
use aetherius_supervisor::Supervisor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::UnixListener;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Notify;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("aetheriusd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("aetheriusd {}", env!("CARGO_PKG_VERSION"));
                println!("Background process that supervises the game server and its components.");
                println!();
                println!("The daemon is normally launched by `aetherius server start` and should");
                println!("not be invoked directly. It listens on a Unix socket for console clients.");
                return Ok(());
            }
            other => {
                eprintln!("error: unexpected argument '{other}'");
                eprintln!("usage: aetheriusd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config_path = std::env::var("AETHERIUS_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("aetherius.toml"));
    let config = Arc::new(DaemonConfig::load(&config_path)?);

    let _log_guard = setup_logging(&config)?;
    info!("starting aetheriusd");

    if let Some(existing_pid) = stale_lock_holder(&config.server_dir.join(".aetheriusd.lock")) {
        eprintln!("aetheriusd is already running (pid {existing_pid})");
        std::process::exit(1);
    }
    write_lock_file(&config.server_dir.join(".aetheriusd.lock"))?;

    let (events_tx, mut events_rx) = tokio::sync::mpsc::unbounded_channel();
    let queue = Arc::new(CommandQueue::new(config.pending_dir(), config.completed_dir())?);
    let state_store = Arc::new(StateStore::new(config.state_file()));
    let supervisor = Arc::new(Supervisor::new(Arc::clone(&config), events_tx.clone(), queue, state_store.clone()));
    let components = Arc::new(ComponentManager::new(
        config.components_dir(),
        Duration::from_secs(config.component_startup_timeout_secs),
        events_tx,
    ));

    let event_bus = EventBus::new();
    let pump_bus = event_bus.clone();
    tokio::spawn(async move {
        while let Some(envelope) = events_rx.recv().await {
            pump_bus.fire(envelope);
        }
    });

    let persisted_pid = state_store.load().ok().flatten().map(|p| p.pid);
    let adopted = match persisted_pid {
        Some(pid) => supervisor.adopt(pid).await,
        None => false,
    };
    if adopted {
        info!(pid = persisted_pid.unwrap_or(0), "adopted an already-running game server");
    } else if let Err(e) = supervisor.start().await {
        error!(error = %e, "failed to start the game server");
        remove_lock_file(&config.server_dir.join(".aetheriusd.lock"));
        return Err(e.into());
    }

    match components.load_all().await {
        Ok(count) => info!(count, "components loaded"),
        Err(e) => error!(error = %e, "component load_all failed"),
    }

    if config.socket_path.exists() {
        let _ = std::fs::remove_file(&config.socket_path);
    }
    if let Some(parent) = config.socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let unix_listener = UnixListener::bind(&config.socket_path)?;

    let shutdown = Arc::new(Notify::new());
    let ctx = Arc::new(ConsoleContext {
        supervisor: Arc::clone(&supervisor),
        components,
        event_bus: event_bus.clone(),
        shutdown: Arc::clone(&shutdown),
        start_time: Instant::now(),
    });
    tokio::spawn(listener::run(unix_listener, ctx));

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!(socket = %config.socket_path.display(), "daemon ready");
    println!("READY");

    tokio::select! {
        _ = shutdown.notified() => info!("shutdown requested over the console"),
        _ = sigterm.recv() => info!("received SIGTERM"),
        _ = sigint.recv() => info!("received SIGINT"),
    }

    if supervisor.state() == aetherius_core::ServerState::Running {
        let stop_timeout = Duration::from_secs(config.stop_grace_secs);
        if let Err(e) = supervisor.stop("daemon shutdown", stop_timeout).await {
            error!(error = %e, "error stopping the game server during shutdown");
        }
    }
    let _ = std::fs::remove_file(&config.socket_path);
    remove_lock_file(&config.server_dir.join(".aetheriusd.lock"));
    info!("daemon stopped");
    Ok(())
}

/// `Some(pid)` if a live daemon already holds the lock file.
fn stale_lock_holder(lock_path: &Path) -> Option<u32> {
    let text = std::fs::read_to_string(lock_path).ok()?;
    let pid: u32 = text.trim().parse().ok()?;
    aetherius_adapters::process_metrics::snapshot(pid).map(|_| pid)
}

fn write_lock_file(lock_path: &Path) -> std::io::Result<()> {
    if let Some(parent) = lock_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(lock_path, std::process::id().to_string())
}

fn remove_lock_file(lock_path: &Path) {
    let _ = std::fs::remove_file(lock_path);
}

fn setup_logging(config: &DaemonConfig) -> Result<tracing_appender::non_blocking::WorkerGuard, std::io::Error> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_path = config.server_dir.join("aetheriusd.log");
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file_appender = tracing_appender::rolling::never(
        log_path.parent().unwrap_or_else(|| Path::new(".")),
        log_path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("aetheriusd.log")),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = if config.log_filter.is_empty() {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::new(config.log_filter.clone())
    };

    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).init();

    Ok(guard)
}

