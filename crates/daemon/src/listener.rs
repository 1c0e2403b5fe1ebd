// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The persistent console: accepts Unix-domain-socket connections, streams
//! server log lines to every connected client, and dispatches submitted
//! commands by prefix (`/` game server, `$` component loader, `!` daemon).

use crate::event_bus::{EventBus, Target};
use crate::protocol::{read_client_message, write_server_message, ClientMessage, ServerMessage};
use aetherius_components::ComponentManager;
use aetherius_core::{Event, EventKind, EventPriority};
use aetherius_supervisor::Supervisor;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{mpsc, Notify};

const COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared state every connection handler dispatches against.
pub struct ConsoleContext {
    pub supervisor: Arc<Supervisor>,
    pub components: Arc<ComponentManager>,
    pub event_bus: EventBus,
    pub shutdown: Arc<Notify>,
    pub start_time: Instant,
}

/// Accepts connections on the console socket and spawns one task per client.
pub async fn run(socket: UnixListener, ctx: Arc<ConsoleContext>) {
    loop {
        match socket.accept().await {
            Ok((stream, _)) => {
                let ctx = Arc::clone(&ctx);
                tokio::spawn(async move {
                    handle_connection(stream, ctx).await;
                });
            }
            Err(e) => tracing::error!(error = %e, "console socket accept failed"),
        }
    }
}

async fn handle_connection(stream: UnixStream, ctx: Arc<ConsoleContext>) {
    let (read_half, write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ServerMessage>();
    let writer_task = tokio::spawn(async move {
        let mut write_half = write_half;
        while let Some(message) = outbound_rx.recv().await {
            if write_server_message(&mut write_half, &message).await.is_err() {
                break;
            }
        }
    });

    let mut log_rx = ctx.event_bus.subscribe(Target::Kind(EventKind::ServerLog), EventPriority::Normal, false);
    let forward_tx = outbound_tx.clone();
    let forwarder = tokio::spawn(async move {
        while let Some(envelope) = log_rx.recv().await {
            if let Event::ServerLog { line, level, .. } = envelope.event {
                let is_error = level.eq_ignore_ascii_case("error");
                if forward_tx.send(ServerMessage::log(line, is_error)).is_err() {
                    break;
                }
            }
        }
    });

    loop {
        match read_client_message(&mut lines).await {
            Ok(Some(ClientMessage::Command { command })) => {
                let response = dispatch(&ctx, &command).await;
                if let Some(response) = response {
                    if outbound_tx.send(response).is_err() {
                        break;
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "malformed console message");
                let _ = outbound_tx.send(ServerMessage::err(e.to_string()));
            }
        }
    }

    forwarder.abort();
    drop(outbound_tx);
    let _ = writer_task.await;
}

/// Route one submitted command line by its prefix. `None` means "no reply".
async fn dispatch(ctx: &ConsoleContext, raw: &str) -> Option<ServerMessage> {
    if let Some(command) = raw.strip_prefix('/') {
        return Some(dispatch_server_command(ctx, command).await);
    }
    if let Some(command) = raw.strip_prefix('$') {
        return Some(dispatch_component_command(ctx, command).await);
    }
    if let Some(command) = raw.strip_prefix('!') {
        return Some(dispatch_system_command(ctx, command).await);
    }
    Some(ServerMessage::ok(
        "unrecognized input; prefix a game command with /, a component command with $, or a daemon command with !",
    ))
}

async fn dispatch_server_command(ctx: &ConsoleContext, command: &str) -> ServerMessage {
    let result = ctx.supervisor.execute_command_with_result(command, COMMAND_TIMEOUT).await;
    if result.success {
        ServerMessage::ok(result.output.unwrap_or_default())
    } else {
        ServerMessage::err(result.error.unwrap_or_else(|| "command failed".to_string()))
    }
}

async fn dispatch_component_command(ctx: &ConsoleContext, command: &str) -> ServerMessage {
    let mut parts = command.trim().splitn(2, char::is_whitespace);
    let verb = parts.next().unwrap_or("");
    let arg = parts.next().unwrap_or("").trim();

    match verb {
        "scan" => match ctx.components.scan().await {
            Ok(found) => ServerMessage::ok(format!("discovered: {}", found.join(", "))),
            Err(e) => ServerMessage::err(e.to_string()),
        },
        "list" => {
            let entries = ctx.components.list().await;
            let text = entries.iter().map(|(name, state)| format!("{name}: {state}")).collect::<Vec<_>>().join("\n");
            ServerMessage::ok(text)
        }
        "load" => reply(ctx.components.load(arg).await, format!("loaded {arg}")),
        "enable" => reply(ctx.components.enable(arg).await, format!("enabled {arg}")),
        "disable" => reply(ctx.components.disable(arg).await, format!("disabled {arg}")),
        "reload" => reply(ctx.components.reload(arg).await, format!("reloaded {arg}")),
        "info" => match ctx.components.info(arg).await {
            Ok(info) => ServerMessage::ok(format!("{} v{} by {}: {}", info.display_name, info.version, info.author, info.description)),
            Err(e) => ServerMessage::err(e.to_string()),
        },
        "stats" => {
            let stats = ctx.components.stats().await;
            ServerMessage::ok(format!(
                "total={} loaded={} enabled={} failed={}",
                stats.total, stats.loaded, stats.enabled, stats.failed
            ))
        }
        "" => ServerMessage::err("missing component verb"),
        other => ServerMessage::err(format!("unknown component verb: {other}")),
    }
}

fn reply<E: std::fmt::Display>(result: Result<(), E>, ok_message: String) -> ServerMessage {
    match result {
        Ok(()) => ServerMessage::ok(ok_message),
        Err(e) => ServerMessage::err(e.to_string()),
    }
}

async fn dispatch_system_command(ctx: &ConsoleContext, command: &str) -> ServerMessage {
    match command.trim() {
        "status" => {
            let state = ctx.supervisor.state();
            let uptime = ctx.start_time.elapsed().as_secs();
            let pid = ctx.supervisor.pid().map(|p| p.to_string()).unwrap_or_else(|| "none".to_string());
            ServerMessage::ok(format!("server: {state} pid: {pid} daemon uptime: {uptime}s"))
        }
        "quit" => {
            ctx.shutdown.notify_one();
            ServerMessage::ok("daemon shutting down")
        }
        "help" => ServerMessage::ok(
            "/<command>     run a game server command\n\
             $list|scan|load <n>|enable <n>|disable <n>|reload <n>|info <n>|stats\n\
             !status|quit|help",
        ),
        other => ServerMessage::err(format!("unknown system command: {other}")),
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
