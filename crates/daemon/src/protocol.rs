// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console wire protocol: newline-delimited UTF-8 JSON, one object per line.
//!
//! Deliberately not length-prefixed: the socket is meant to stay inspectable
//! with `nc`/`socat` while developing a component or chasing a bug.

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt};

pub const PROTOCOL_VERSION: &str = "1";

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("connection closed")]
    ConnectionClosed,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),
}

/// A message sent by a client over the console socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "command")]
    Command { command: String },
}

/// A message sent by the daemon to a connected client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "log")]
    Log { content: String, is_error: bool },
    #[serde(rename = "response")]
    Response { success: bool, output: String, error: String },
}

impl ServerMessage {
    pub fn log(content: impl Into<String>, is_error: bool) -> Self {
        ServerMessage::Log { content: content.into(), is_error }
    }

    pub fn ok(output: impl Into<String>) -> Self {
        ServerMessage::Response { success: true, output: output.into(), error: String::new() }
    }

    pub fn err(error: impl Into<String>) -> Self {
        ServerMessage::Response { success: false, output: String::new(), error: error.into() }
    }
}

/// Read one newline-delimited JSON client message, skipping blank lines.
/// `Ok(None)` means EOF.
pub async fn read_client_message(
    lines: &mut tokio::io::Lines<impl tokio::io::AsyncBufRead + Unpin>,
) -> Result<Option<ClientMessage>, ProtocolError> {
    loop {
        match lines.next_line().await? {
            None => return Ok(None),
            Some(line) if line.trim().is_empty() => continue,
            Some(line) => return Ok(Some(serde_json::from_str(&line)?)),
        }
    }
}

/// Write one newline-terminated JSON message.
pub async fn write_server_message(
    writer: &mut (impl tokio::io::AsyncWrite + Unpin),
    message: &ServerMessage,
) -> Result<(), ProtocolError> {
    let mut text = serde_json::to_string(message)?;
    text.push('\n');
    writer.write_all(text.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one newline-delimited JSON server message, skipping blank lines.
/// `Ok(None)` means EOF. Used by console clients.
pub async fn read_server_message(
    lines: &mut tokio::io::Lines<impl tokio::io::AsyncBufRead + Unpin>,
) -> Result<Option<ServerMessage>, ProtocolError> {
    loop {
        match lines.next_line().await? {
            None => return Ok(None),
            Some(line) if line.trim().is_empty() => continue,
            Some(line) => return Ok(Some(serde_json::from_str(&line)?)),
        }
    }
}

/// Write one newline-terminated JSON message. Used by console clients.
pub async fn write_client_message(
    writer: &mut (impl tokio::io::AsyncWrite + Unpin),
    message: &ClientMessage,
) -> Result<(), ProtocolError> {
    let mut text = serde_json::to_string(message)?;
    text.push('\n');
    writer.write_all(text.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
