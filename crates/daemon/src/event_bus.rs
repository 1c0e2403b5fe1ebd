// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory event bus. Each listener is a synchronous callback invoked
//! in-line during dispatch — the only way a higher-priority listener's
//! cancellation can actually stop a lower-priority one from running.
//! Channel-backed subscribers (the common case: stream events out to an
//! async task) are a thin adapter over that callback that clones the
//! envelope into an `mpsc::UnboundedSender` and reports the send's success
//! as its liveness.
//!
//! Dispatch order matches the original: within one concrete kind, listeners
//! fire in descending priority, ties preserve registration order. A listener
//! may instead target a whole [`EventFamily`], or every event.

use aetherius_core::{Envelope, EventFamily, EventKind, EventPriority};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::mpsc;

const HISTORY_CAPACITY: usize = 1000;

/// What a subscription listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Kind(EventKind),
    Family(EventFamily),
    All,
}

impl Target {
    fn matches(self, kind: EventKind) -> bool {
        match self {
            Target::Kind(k) => k == kind,
            Target::Family(f) => kind.family() == f,
            Target::All => true,
        }
    }
}

/// Invoked with the in-flight envelope; returns `false` once the listener
/// is dead (e.g. its channel receiver was dropped) so `fire` can prune it.
type Callback = Box<dyn Fn(&mut Envelope) -> bool + Send + Sync>;

struct Listener {
    target: Target,
    priority: EventPriority,
    ignore_cancelled: bool,
    callback: Callback,
}

struct Inner {
    listeners: Vec<Listener>,
    history: VecDeque<Envelope>,
    stats: HashMap<EventKind, u64>,
}

/// Fans fired events out to subscribed listeners, keeping a bounded history
/// and per-kind counters for introspection.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<parking_lot::Mutex<Inner>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(parking_lot::Mutex::new(Inner {
                listeners: Vec::new(),
                history: VecDeque::with_capacity(HISTORY_CAPACITY),
                stats: HashMap::new(),
            })),
        }
    }

    /// Register a channel-backed listener: every matching event reaches the
    /// returned receiver unless a higher-priority listener has cancelled it
    /// and `ignore_cancelled` is false.
    pub fn subscribe(
        &self,
        target: Target,
        priority: EventPriority,
        ignore_cancelled: bool,
    ) -> mpsc::UnboundedReceiver<Envelope> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.register(target, priority, ignore_cancelled, move |envelope: &mut Envelope| {
            tx.send(envelope.clone()).is_ok()
        });
        rx
    }

    /// Register a listener that runs synchronously in dispatch order and may
    /// mutate the envelope — including cancelling it via `Envelope::cancel`,
    /// which stops any subsequent listener that doesn't set
    /// `ignore_cancelled` from running. The callback returns `false` to
    /// unregister itself.
    pub fn subscribe_sync<F>(&self, target: Target, priority: EventPriority, ignore_cancelled: bool, callback: F)
    where
        F: Fn(&mut Envelope) -> bool + Send + Sync + 'static,
    {
        self.register(target, priority, ignore_cancelled, callback);
    }

    /// Insertion is the original linear-scan-and-insert-before-lower-priority
    /// algorithm, so equal priorities keep arrival order.
    fn register<F>(&self, target: Target, priority: EventPriority, ignore_cancelled: bool, callback: F)
    where
        F: Fn(&mut Envelope) -> bool + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock();
        let pos = inner.listeners.iter().position(|l| priority > l.priority);
        let listener = Listener { target, priority, ignore_cancelled, callback: Box::new(callback) };
        match pos {
            Some(i) => inner.listeners.insert(i, listener),
            None => inner.listeners.push(listener),
        }
    }

    /// Dispatch one envelope: invoke each matching listener in priority
    /// order against the same mutable envelope, skipping any listener that
    /// doesn't set `ignore_cancelled` once a prior listener has cancelled
    /// it. Dead listeners (callback returned `false`) are pruned afterward.
    pub fn fire(&self, mut envelope: Envelope) {
        let kind = envelope.kind();
        let mut inner = self.inner.lock();
        *inner.stats.entry(kind).or_insert(0) += 1;

        let mut dead = Vec::new();
        for (i, listener) in inner.listeners.iter().enumerate() {
            if !listener.target.matches(kind) {
                continue;
            }
            if envelope.cancelled && !listener.ignore_cancelled {
                continue;
            }
            if !(listener.callback)(&mut envelope) {
                dead.push(i);
            }
        }
        for i in dead.into_iter().rev() {
            inner.listeners.remove(i);
        }

        if inner.history.len() == HISTORY_CAPACITY {
            inner.history.pop_front();
        }
        inner.history.push_back(envelope);
    }

    pub fn stats(&self) -> HashMap<EventKind, u64> {
        self.inner.lock().stats.clone()
    }

    pub fn history(&self) -> Vec<Envelope> {
        self.inner.lock().history.iter().cloned().collect()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock().listeners.len()
    }
}

#[cfg(test)]
#[path = "event_bus_tests.rs"]
mod tests;
