// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! POSIX named-pipe (FIFO) bridge: lets an unrelated process hand a raw
//! command line to the supervisor's stdin without going through the
//! file-queue or holding a socket open.

use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

#[derive(Debug, thiserror::Error)]
pub enum FifoError {
    #[error("creating fifo {path}: {source}")]
    Create { path: PathBuf, source: std::io::Error },
    #[error("opening fifo {path}: {source}")]
    Open { path: PathBuf, source: std::io::Error },
}

pub fn bridge_path(prefix: &str, pid: u32) -> PathBuf {
    PathBuf::from(format!("/tmp/{prefix}_{pid}.pipe"))
}

#[cfg(unix)]
pub fn create(path: &Path) -> Result<(), FifoError> {
    if path.exists() {
        let _ = std::fs::remove_file(path);
    }
    let c_path = std::ffi::CString::new(path.as_os_str().as_encoded_bytes())
        .map_err(|_| FifoError::Create {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "nul byte in path"),
        })?;
    let rc = unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) };
    if rc != 0 {
        return Err(FifoError::Create { path: path.to_path_buf(), source: std::io::Error::last_os_error() });
    }
    Ok(())
}

pub fn remove(path: &Path) {
    let _ = std::fs::remove_file(path);
}

/// Spawn a blocking reader thread over the FIFO that forwards each trimmed
/// line to the returned channel. The FIFO is opened for reading in a loop:
/// once a writer closes its end, `read` returns EOF and we reopen, since a
/// FIFO delivers EOF once per writer generation.
pub fn listen(path: PathBuf) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(64);
    std::thread::spawn(move || loop {
        let file = match std::fs::File::open(&path) {
            Ok(f) => f,
            Err(_) => break,
        };
        use std::io::BufRead;
        let reader = std::io::BufReader::new(file);
        for line in reader.lines().map_while(Result::ok) {
            let trimmed = line.trim().to_string();
            if trimmed.is_empty() {
                continue;
            }
            if tx.blocking_send(trimmed).is_err() {
                return;
            }
        }
        if !path.exists() {
            break;
        }
    });
    rx
}

#[cfg(test)]
#[path = "fifo_tests.rs"]
mod tests;
