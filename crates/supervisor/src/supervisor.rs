// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The process supervisor: owns the game server child process, its
//! five-state lifecycle, and the command-queue processor that drains the
//! cross-process pipeline into the child's stdin.

use crate::errors::SupervisorError;
use crate::output_capture::{clean_line, is_line_relevant};
use aetherius_adapters::{looks_like_game_server, process_metrics};
use aetherius_core::{
    CommandId, CommandOutputCapture, CommandResult, CommandStatus, CompletedCommand, DaemonConfig,
    Envelope, Event, PersistentState, ServerState,
};
use aetherius_parser::LogParser;
use aetherius_storage::{CommandQueue, StateStore};
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::{mpsc, oneshot, Mutex as AsyncMutex};
use tokio::task::JoinHandle;

struct Inner {
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    start_instant: Option<Instant>,
    fifo_path: Option<PathBuf>,
    ready_tx: Option<oneshot::Sender<f64>>,
    tasks: Vec<JoinHandle<()>>,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            child: None,
            stdin: None,
            start_instant: None,
            fifo_path: None,
            ready_tx: None,
            tasks: Vec::new(),
        }
    }
}

/// Owns one game server process plus its command pipeline.
pub struct Supervisor {
    config: Arc<DaemonConfig>,
    state: Arc<parking_lot::RwLock<ServerState>>,
    pid: Arc<AtomicU32>,
    adopted: Arc<AtomicBool>,
    events_tx: mpsc::UnboundedSender<Envelope>,
    parser: Arc<LogParser>,
    queue: Arc<CommandQueue>,
    state_store: Arc<StateStore>,
    inner: Arc<AsyncMutex<Inner>>,
    captures: Arc<AsyncMutex<HashMap<CommandId, CommandOutputCapture>>>,
}

impl Supervisor {
    pub fn new(
        config: Arc<DaemonConfig>,
        events_tx: mpsc::UnboundedSender<Envelope>,
        queue: Arc<CommandQueue>,
        state_store: Arc<StateStore>,
    ) -> Self {
        Self {
            config,
            state: Arc::new(parking_lot::RwLock::new(ServerState::Stopped)),
            pid: Arc::new(AtomicU32::new(0)),
            adopted: Arc::new(AtomicBool::new(false)),
            events_tx,
            parser: Arc::new(LogParser::new()),
            queue,
            state_store,
            inner: Arc::new(AsyncMutex::new(Inner::default())),
            captures: Arc::new(AsyncMutex::new(HashMap::new())),
        }
    }

    pub fn state(&self) -> ServerState {
        *self.state.read()
    }

    pub fn pid(&self) -> Option<u32> {
        match self.pid.load(Ordering::SeqCst) {
            0 => None,
            pid => Some(pid),
        }
    }

    fn set_state(&self, new_state: ServerState, reason: Option<String>) {
        let old_state = {
            let mut guard = self.state.write();
            let old = *guard;
            if old == new_state {
                return;
            }
            *guard = new_state;
            old
        };
        self.fire(Event::ServerStateChanged { old_state, new_state, reason });
    }

    fn fire(&self, event: Event) {
        let _ = self.events_tx.send(Envelope::new(event));
    }

    /// Best-effort process metrics; `None` if there is no process or it is gone.
    pub fn metrics(&self) -> Option<process_metrics::ProcessMetrics> {
        process_metrics::snapshot(self.pid()?)
    }

    /// Start the child process. Requires `Stopped` or `Crashed`.
    pub async fn start(&self) -> Result<(), SupervisorError> {
        let current = self.state();
        if !matches!(current, ServerState::Stopped | ServerState::Crashed) {
            return Err(SupervisorError::InvalidTransition {
                action: "start",
                state: state_name(current),
            });
        }

        let jar = self.config.jar_full_path();
        if !jar.exists() {
            return Err(SupervisorError::JarNotFound(jar));
        }

        self.set_state(ServerState::Starting, None);
        self.fire(Event::ServerStarting {
            command: vec!["java".to_string(), "-jar".to_string(), jar.display().to_string()],
            working_directory: self.config.server_dir.display().to_string(),
        });

        let mut cmd = Command::new("java");
        cmd.args(&self.config.launch_args)
            .arg("-jar")
            .arg(&jar)
            .arg("--nogui")
            .current_dir(&self.config.server_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        unsafe {
            cmd.pre_exec(|| {
                if libc::setpgid(0, 0) != 0 {
                    return Err(std::io::Error::last_os_error());
                }
                Ok(())
            });
        }

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(source) => {
                self.set_state(ServerState::Crashed, Some(source.to_string()));
                return Err(SupervisorError::Spawn(source));
            }
        };

        let pid = child.id().unwrap_or(0);
        self.pid.store(pid, Ordering::SeqCst);
        self.adopted.store(false, Ordering::SeqCst);

        self.state_store.save(&PersistentState::new(
            pid,
            jar.display().to_string(),
            self.config.server_dir.display().to_string(),
        ))?;

        let fifo_path = aetherius_adapters::bridge_path(&self.config.fifo_prefix, pid);
        let _ = aetherius_adapters::fifo::create(&fifo_path);

        let stdin = child.stdin.take();
        let stdout = child.stdout.take().expect("stdout is piped");
        let stderr = child.stderr.take().expect("stderr is piped");

        let (ready_tx, ready_rx) = oneshot::channel();
        let start_instant = Instant::now();

        {
            let mut inner = self.inner.lock().await;
            inner.stdin = stdin;
            inner.start_instant = Some(start_instant);
            inner.fifo_path = Some(fifo_path.clone());
            inner.ready_tx = Some(ready_tx);
            inner.child = Some(child);
        }

        let ready_re = Regex::new(&self.config.ready_pattern).unwrap_or_else(|_| {
            Regex::new(r"Done \(([\d.]+)s\)").expect("fallback ready pattern compiles")
        });

        self.spawn_stdout_pump(stdout, ready_re).await;
        self.spawn_stderr_pump(stderr).await;
        self.spawn_monitor().await;
        self.spawn_fifo_listener(fifo_path).await;
        self.spawn_queue_processor().await;

        let startup_time = match tokio::time::timeout(Duration::from_secs(5), ready_rx).await {
            Ok(Ok(elapsed)) => elapsed,
            _ => start_instant.elapsed().as_secs_f64(),
        };

        self.set_state(ServerState::Running, None);
        self.fire(Event::ServerStarted { pid, startup_time });
        Ok(())
    }

    async fn spawn_stdout_pump(&self, stdout: tokio::process::ChildStdout, ready_re: Regex) {
        let events_tx = self.events_tx.clone();
        let parser = self.parser.clone();
        let state = self.state.clone();
        let inner = self.inner.clone();
        let captures = self.captures.clone();
        let handle = tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(raw)) = lines.next_line().await {
                let line = raw.trim_end().to_string();
                if line.is_empty() {
                    continue;
                }
                let _ = events_tx.send(Envelope::new(Event::ServerLog {
                    line: line.clone(),
                    level: "INFO".to_string(),
                    message: line.clone(),
                    log_timestamp: None,
                }));
                for envelope in parser.parse(&line) {
                    // The supervisor fires the canonical ServerStarted itself, with
                    // the real pid, once ready_rx resolves below.
                    if matches!(envelope.event, Event::ServerStarted { .. }) {
                        continue;
                    }
                    let _ = events_tx.send(envelope);
                }
                record_capture_line(&captures, &line).await;
                if *state.read() == ServerState::Starting {
                    if let Some(caps) = ready_re.captures(&line) {
                        let elapsed = caps
                            .get(1)
                            .and_then(|m| m.as_str().parse::<f64>().ok());
                        let mut guard = inner.lock().await;
                        if let Some(tx) = guard.ready_tx.take() {
                            let elapsed = elapsed.unwrap_or_else(|| {
                                guard.start_instant.map(|i| i.elapsed().as_secs_f64()).unwrap_or(0.0)
                            });
                            let _ = tx.send(elapsed);
                        }
                    }
                }
            }
        });
        self.track_task(handle).await;
    }

    async fn spawn_stderr_pump(&self, stderr: tokio::process::ChildStderr) {
        let events_tx = self.events_tx.clone();
        let captures = self.captures.clone();
        let handle = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(raw)) = lines.next_line().await {
                let line = raw.trim_end().to_string();
                if line.is_empty() {
                    continue;
                }
                let _ = events_tx.send(Envelope::new(Event::ServerLog {
                    line: line.clone(),
                    level: "ERROR".to_string(),
                    message: line.clone(),
                    log_timestamp: None,
                }));
                record_capture_line(&captures, &line).await;
            }
        });
        self.track_task(handle).await;
    }

    /// Await the child's exit and, unless a deliberate stop is already in
    /// progress, transition to `Crashed` and fire the crash events.
    async fn spawn_monitor(&self) {
        let state = self.state.clone();
        let events_tx = self.events_tx.clone();
        let state_store = self.state_store.clone();
        let pid_atomic = self.pid.clone();
        let inner = self.inner.clone();
        let auto_restart = self.config.auto_restart;
        let handle = tokio::spawn(async move {
            let exit_code = loop {
                let mut guard = inner.lock().await;
                let Some(child) = guard.child.as_mut() else {
                    return;
                };
                match child.try_wait() {
                    Ok(Some(status)) => break status.code().unwrap_or(-1),
                    Ok(None) => {
                        drop(guard);
                        tokio::time::sleep(Duration::from_millis(200)).await;
                    }
                    Err(_) => break -1,
                }
            };

            let prior = *state.read();
            if !matches!(prior, ServerState::Stopping | ServerState::Stopped) {
                *state.write() = ServerState::Crashed;
                let _ = events_tx.send(Envelope::new(Event::ServerStateChanged {
                    old_state: prior,
                    new_state: ServerState::Crashed,
                    reason: Some("process exited unexpectedly".to_string()),
                }));
                if auto_restart {
                    tracing::info!("auto_restart is enabled; a restart policy is not yet implemented, so the server stays down");
                }
                let _ = events_tx.send(Envelope::new(Event::ServerCrashed {
                    exit_code,
                    error_output: "server process terminated unexpectedly".to_string(),
                    will_restart: false,
                }));
                let _ = state_store.clear();
                pid_atomic.store(0, Ordering::SeqCst);
                let mut guard = inner.lock().await;
                guard.child = None;
                guard.stdin = None;
            }
        });
        self.track_task(handle).await;
    }

    async fn spawn_fifo_listener(&self, fifo_path: PathBuf) {
        let mut rx = aetherius_adapters::fifo::listen(fifo_path);
        let this_inner = self.inner.clone();
        let handle = tokio::spawn(async move {
            while let Some(line) = rx.recv().await {
                let mut guard = this_inner.lock().await;
                if let Some(stdin) = guard.stdin.as_mut() {
                    let _ = stdin.write_all(format!("{line}\n").as_bytes()).await;
                    let _ = stdin.flush().await;
                }
            }
        });
        self.track_task(handle).await;
    }

    async fn spawn_queue_processor(&self) {
        let queue = self.queue.clone();
        let inner = self.inner.clone();
        let captures = self.captures.clone();
        let state = self.state.clone();
        let poll_interval = Duration::from_millis(self.config.queue_poll_interval_ms);
        let gc_age = Duration::from_secs(self.config.queue_gc_age_secs);
        let capture_window = Duration::from_secs_f64(self.config.queue_capture_window_secs);
        let handle = tokio::spawn(async move {
            loop {
                if *state.read() != ServerState::Running {
                    tokio::time::sleep(poll_interval).await;
                    continue;
                }
                if let Ok((pending, corrupt)) = queue.poll_pending() {
                    for bad in &corrupt {
                        let _ = queue.delete_corrupt(bad);
                        tracing::warn!(path = %bad.path.display(), "dropping corrupt pending command");
                    }
                    for request in pending {
                        let now = aetherius_storage::epoch_secs();
                        if now - request.timestamp > request.timeout {
                            let _ = queue.complete(CommandQueue::timeout_result(request.id));
                            continue;
                        }
                        let capture = CommandOutputCapture::new(request.id.clone(), &request.command);
                        {
                            let mut guard = captures.lock().await;
                            guard.insert(request.id.clone(), capture);
                        }

                        let sent = {
                            let mut guard = inner.lock().await;
                            if let Some(stdin) = guard.stdin.as_mut() {
                                let payload = format!("{}\n", request.command.trim());
                                stdin.write_all(payload.as_bytes()).await.is_ok()
                            } else {
                                false
                            }
                        };

                        tokio::time::sleep(capture_window).await;

                        let captured = {
                            let mut guard = captures.lock().await;
                            guard.remove(&request.id)
                        };

                        let result = CompletedCommand {
                            id: request.id.clone(),
                            status: CommandStatus::Completed,
                            success: sent,
                            timestamp: aetherius_storage::epoch_secs(),
                            error: if sent { None } else { Some("failed to write command to stdin".to_string()) },
                            output: captured.and_then(|c| c.output()),
                        };
                        let _ = queue.complete(result);
                    }
                }
                let _ = queue.gc(gc_age);
                tokio::time::sleep(poll_interval).await;
            }
        });
        self.track_task(handle).await;
    }

    async fn track_task(&self, handle: JoinHandle<()>) {
        self.inner.lock().await.tasks.push(handle);
    }

    /// Send a raw command line to the child's stdin. Requires `Running`.
    pub async fn send_command(&self, text: &str) -> Result<(), SupervisorError> {
        if self.state() != ServerState::Running {
            return Err(SupervisorError::NotRunning);
        }
        let mut guard = self.inner.lock().await;
        let Some(stdin) = guard.stdin.as_mut() else {
            return Err(SupervisorError::BrokenPipe);
        };
        let payload = format!("{}\n", text.trim());
        if stdin.write_all(payload.as_bytes()).await.is_err() || stdin.flush().await.is_err() {
            drop(guard);
            self.set_state(ServerState::Crashed, Some("broken stdin pipe".to_string()));
            return Err(SupervisorError::BrokenPipe);
        }
        Ok(())
    }

    /// The synchronous-reply primitive: in-process direct capture when this
    /// process owns the child's stdin, otherwise the cross-process queue.
    pub async fn execute_command_with_result(&self, text: &str, timeout: Duration) -> CommandResult {
        let start = Instant::now();
        let id = CommandId::generate();

        let owns_stdin = {
            let guard = self.inner.lock().await;
            guard.stdin.is_some()
        };

        if self.state() == ServerState::Running && owns_stdin {
            let mut capture = CommandOutputCapture::new(id.clone(), text);
            {
                let mut guard = self.captures.lock().await;
                guard.insert(id.clone(), capture.clone());
            }
            if let Err(e) = self.send_command(text).await {
                let mut guard = self.captures.lock().await;
                guard.remove(&id);
                return CommandResult {
                    id,
                    success: false,
                    output: None,
                    error: Some(e.to_string()),
                    execution_time: start.elapsed().as_secs_f64(),
                };
            }
            tokio::time::sleep(Duration::from_secs_f64(self.config.in_process_capture_window_secs)).await;
            capture = {
                let mut guard = self.captures.lock().await;
                guard.remove(&id).unwrap_or(capture)
            };
            return CommandResult {
                id,
                success: true,
                output: capture.output(),
                error: None,
                execution_time: start.elapsed().as_secs_f64(),
            };
        }

        match self.queue.submit(text, timeout.as_secs_f64()) {
            Ok(queued_id) => {
                let deadline = Instant::now() + timeout;
                loop {
                    if let Ok(Some(completed)) = self.queue.take_completed(&queued_id) {
                        return CommandResult {
                            id: queued_id,
                            success: completed.success,
                            output: completed.output,
                            error: completed.error,
                            execution_time: start.elapsed().as_secs_f64(),
                        };
                    }
                    if Instant::now() >= deadline {
                        return CommandResult::timeout(queued_id);
                    }
                    tokio::time::sleep(Duration::from_millis(200)).await;
                }
            }
            Err(e) => CommandResult {
                id,
                success: false,
                output: None,
                error: Some(e.to_string()),
                execution_time: start.elapsed().as_secs_f64(),
            },
        }
    }

    /// Stop the child. Requires `Running` or `Starting`.
    pub async fn stop(&self, reason: &str, timeout: Duration) -> Result<(), SupervisorError> {
        let current = self.state();
        if !matches!(current, ServerState::Running | ServerState::Starting) {
            return Err(SupervisorError::InvalidTransition {
                action: "stop",
                state: state_name(current),
            });
        }

        self.set_state(ServerState::Stopping, Some(reason.to_string()));
        self.fire(Event::ServerStopping { reason: reason.to_string(), force: false });

        let start_instant = { self.inner.lock().await.start_instant };

        {
            let mut guard = self.inner.lock().await;
            if let Some(stdin) = guard.stdin.as_mut() {
                let _ = stdin.write_all(b"stop\n").await;
                let _ = stdin.flush().await;
            }
        }

        let exit_code = self.await_exit_or_escalate(timeout).await;

        {
            let mut guard = self.inner.lock().await;
            for task in guard.tasks.drain(..) {
                task.abort();
            }
            if let Some(path) = guard.fifo_path.take() {
                aetherius_adapters::fifo::remove(&path);
            }
            guard.child = None;
            guard.stdin = None;
        }

        self.pid.store(0, Ordering::SeqCst);
        let _ = self.state_store.clear();
        self.set_state(ServerState::Stopped, None);

        let uptime = start_instant.map(|i| i.elapsed().as_secs_f64()).unwrap_or(0.0);
        self.fire(Event::ServerStopped { exit_code, uptime });
        Ok(())
    }

    async fn await_exit_or_escalate(&self, timeout: Duration) -> i32 {
        let graceful = {
            let mut guard = self.inner.lock().await;
            match guard.child.as_mut() {
                Some(child) => tokio::time::timeout(timeout, child.wait()).await,
                None => return -1,
            }
        };

        if let Ok(Ok(status)) = graceful {
            return status.code().unwrap_or(0);
        }

        if let Some(pid) = self.pid() {
            #[cfg(unix)]
            unsafe {
                libc::kill(pid as i32, libc::SIGTERM);
            }
        }
        let kill_grace = Duration::from_secs(self.config.kill_grace_secs);
        let after_term = {
            let mut guard = self.inner.lock().await;
            match guard.child.as_mut() {
                Some(child) => tokio::time::timeout(kill_grace, child.wait()).await,
                None => return -1,
            }
        };
        if let Ok(Ok(status)) = after_term {
            return status.code().unwrap_or(0);
        }

        let mut guard = self.inner.lock().await;
        if let Some(child) = guard.child.as_mut() {
            let _ = child.kill().await;
            if let Ok(status) = child.wait().await {
                return status.code().unwrap_or(-1);
            }
        }
        -1
    }

    /// Adopt a live pid named by the persistent state file at startup: the
    /// process looks like a game server, so believe it is `Running`, but
    /// note that stdin/stdout are unavailable since we did not spawn it.
    pub async fn adopt(&self, pid: u32) -> bool {
        if !looks_like_game_server(pid) {
            return false;
        }
        self.pid.store(pid, Ordering::SeqCst);
        self.adopted.store(true, Ordering::SeqCst);
        self.set_state(ServerState::Running, Some("adopted from persistent state".to_string()));
        self.spawn_adoption_watchdog(pid).await;
        true
    }

    pub fn is_adopted(&self) -> bool {
        self.adopted.load(Ordering::SeqCst)
    }

    async fn spawn_adoption_watchdog(&self, pid: u32) {
        let state = self.state.clone();
        let events_tx = self.events_tx.clone();
        let pid_atomic = self.pid.clone();
        let state_store = self.state_store.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(5)).await;
                if process_metrics::snapshot(pid).is_none() {
                    let prior = *state.read();
                    *state.write() = ServerState::Stopped;
                    let _ = events_tx.send(Envelope::new(Event::ServerStateChanged {
                        old_state: prior,
                        new_state: ServerState::Stopped,
                        reason: Some("adopted process exited".to_string()),
                    }));
                    let _ = state_store.clear();
                    pid_atomic.store(0, Ordering::SeqCst);
                    break;
                }
            }
        });
        self.track_task(handle).await;
    }
}

async fn record_capture_line(
    captures: &Arc<AsyncMutex<HashMap<CommandId, CommandOutputCapture>>>,
    line: &str,
) {
    let mut guard = captures.lock().await;
    if guard.is_empty() {
        return;
    }
    let cleaned = clean_line(line);
    for capture in guard.values_mut() {
        if is_line_relevant(&capture.base_verb, &cleaned) {
            capture.add_line(cleaned.clone());
        }
    }
}

fn state_name(state: ServerState) -> &'static str {
    match state {
        ServerState::Stopped => "stopped",
        ServerState::Starting => "starting",
        ServerState::Running => "running",
        ServerState::Stopping => "stopping",
        ServerState::Crashed => "crashed",
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
