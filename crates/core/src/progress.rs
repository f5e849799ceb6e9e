// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Login progress events
//!
//! Each `login_platform` invocation gets its own ordered sink; the
//! orchestrator pushes events and never waits for the consumer to drain
//! them. Exactly one terminal event (`success` or `error`) is emitted per
//! invocation.

use crate::account::{AccountId, CredentialHandle};
use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// A structured login progress event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LoginEvent {
    Start {
        platform: Platform,
        account_name: String,
        session_id: Option<String>,
    },
    /// The login page presented a QR code; `img` is an image reference
    /// (typically a data URL) for the caller to display
    Qrcode { img: String },
    /// A human must complete the login and confirm with the session id
    ManualRequired { session_id: String },
    Success {
        account_id: AccountId,
        credential: CredentialHandle,
    },
    Error { message: String },
}

impl LoginEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoginEvent::Success { .. } | LoginEvent::Error { .. })
    }
}

/// Producer half of a per-invocation progress channel
#[derive(Clone)]
pub struct ProgressSink {
    tx: mpsc::UnboundedSender<LoginEvent>,
}

/// Consumer half of a per-invocation progress channel
pub struct ProgressStream {
    rx: mpsc::UnboundedReceiver<LoginEvent>,
}

/// Create a connected sink/stream pair
pub fn channel() -> (ProgressSink, ProgressStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ProgressSink { tx }, ProgressStream { rx })
}

impl ProgressSink {
    /// Push an event. A departed consumer is not an error: the flow
    /// keeps running and the event is dropped.
    pub fn push(&self, event: LoginEvent) {
        let _ = self.tx.send(event);
    }
}

impl ProgressStream {
    /// Wait for the next event; None once the sink is dropped
    pub async fn next(&mut self) -> Option<LoginEvent> {
        self.rx.recv().await
    }

    /// Collect every remaining event without waiting for more
    pub fn drain(&mut self) -> Vec<LoginEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
