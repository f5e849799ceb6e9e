// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manual login session registry
//!
//! In-memory only. Each entry pairs a session id with a single-fire
//! confirmation signal; the login orchestrator waits on the receiving
//! half while a separate caller confirms from another execution context.
//! Entries never outlive the login invocation that created them.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

struct Entry {
    confirm: oneshot::Sender<()>,
    created_at: DateTime<Utc>,
}

/// Shared registry of pending manual confirmations
#[derive(Clone, Default)]
pub struct ManualSessionRegistry {
    inner: Arc<Mutex<HashMap<String, Entry>>>,
}

impl ManualSessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session and hand back the waiting half of its signal
    ///
    /// Re-registering an id replaces the previous entry; the superseded
    /// waiter observes its receiver closing.
    pub fn register(&self, id: impl Into<String>, now: DateTime<Utc>) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(
                id.into(),
                Entry {
                    confirm: tx,
                    created_at: now,
                },
            );
        rx
    }

    /// Fire a session's confirmation signal exactly once
    ///
    /// Unknown or already-consumed ids return false and change nothing.
    pub fn confirm(&self, id: &str) -> bool {
        let entry = self
            .inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id);
        match entry {
            // send fails when the waiter already gave up; that still
            // counts as a miss for the caller
            Some(entry) => entry.confirm.send(()).is_ok(),
            None => false,
        }
    }

    /// Drop a session without firing it
    pub fn remove(&self, id: &str) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id)
            .is_some()
    }

    pub fn created_at(&self, id: &str) -> Option<DateTime<Utc>> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .map(|e| e.created_at)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "sessions_tests.rs"]
mod tests;
