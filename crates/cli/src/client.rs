// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console socket client: the CLI's half of the newline-delimited JSON wire
//! protocol the daemon speaks (see `aetherius_daemon::protocol`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use aetherius_daemon::protocol::{
    read_server_message, write_client_message, ClientMessage, ServerMessage,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixStream;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("daemon is not running")]
    NotRunning,
    #[error("failed to start the daemon: {0}")]
    DaemonStartFailed(String),
    #[error("timed out waiting for the daemon")]
    Timeout,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Protocol(#[from] aetherius_daemon::protocol::ProtocolError),
}

/// How long a one-shot command waits for a response before giving up.
pub fn timeout_exit() -> Duration {
    Duration::from_secs(15)
}

/// How often background waits (daemon startup, shutdown polling) recheck.
pub fn poll_interval() -> Duration {
    Duration::from_millis(100)
}

pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    pub fn is_reachable(&self) -> bool {
        probe_socket(&self.socket_path)
    }

    async fn connect(&self) -> Result<UnixStream, ClientError> {
        if !self.socket_path.exists() {
            return Err(ClientError::NotRunning);
        }
        UnixStream::connect(&self.socket_path)
            .await
            .map_err(|_| ClientError::NotRunning)
    }

    /// Send one command and wait for its response, printing any log lines
    /// the daemon forwards in the meantime.
    pub async fn send_command(&self, raw: &str) -> Result<ServerMessage, ClientError> {
        let stream = self.connect().await?;
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();

        write_client_message(
            &mut write_half,
            &ClientMessage::Command {
                command: raw.to_string(),
            },
        )
        .await?;

        loop {
            match read_server_message(&mut lines).await? {
                Some(ServerMessage::Log { content, is_error }) => {
                    if is_error {
                        eprintln!("{content}");
                    } else {
                        println!("{content}");
                    }
                }
                Some(response @ ServerMessage::Response { .. }) => return Ok(response),
                None => return Err(ClientError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "daemon closed the connection before replying",
                ))),
            }
        }
    }

    /// Run an interactive console: forward stdin lines as commands, print
    /// everything the daemon sends back until the connection closes or the
    /// user types `quit`/`exit`.
    pub async fn run_console(&self) -> Result<(), ClientError> {
        let stream = self.connect().await?;
        let (read_half, mut write_half) = stream.into_split();
        let mut server_lines = BufReader::new(read_half).lines();

        let reader_task = tokio::spawn(async move {
            while let Ok(Some(message)) = read_server_message(&mut server_lines).await {
                match message {
                    ServerMessage::Log { content, is_error } => {
                        if is_error {
                            eprintln!("{content}");
                        } else {
                            println!("{content}");
                        }
                    }
                    ServerMessage::Response {
                        success,
                        output,
                        error,
                    } => {
                        if success {
                            if !output.is_empty() {
                                println!("{output}");
                            }
                        } else {
                            eprintln!("error: {error}");
                        }
                    }
                }
            }
        });

        let mut stdin_lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = stdin_lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if matches!(trimmed, "quit" | "exit") {
                break;
            }
            let message = ClientMessage::Command {
                command: trimmed.to_string(),
            };
            if write_client_message(&mut write_half, &message).await.is_err() {
                break;
            }
        }

        reader_task.abort();
        Ok(())
    }
}

/// Probe whether a Unix socket is accepting connections.
pub fn probe_socket(socket_path: &Path) -> bool {
    std::os::unix::net::UnixStream::connect(socket_path).is_ok()
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
