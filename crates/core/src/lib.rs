// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! crosspost-core: Domain model for the crosspost publishing orchestrator
//!
//! This crate provides:
//! - The platform catalog and credential handle types
//! - Pure record types and state machines for accounts and publish tasks
//! - Append-only history and verification-log records
//! - Login progress events and per-invocation progress sinks
//! - Adapter traits for the external publisher, credential client, and
//!   browser session provider
//! - Clock and id-generation abstractions for testable time and ids

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod clock;
pub mod error;
pub mod id;

pub mod account;
pub mod adapters;
pub mod history;
pub mod platform;
pub mod progress;
pub mod task;

// Re-exports
pub use account::{Account, AccountId, AccountSpec, AccountStatus, CredentialHandle};
pub use clock::{Clock, FakeClock, SystemClock};
pub use error::Error;
pub use history::{PublishHistoryRecord, VerificationLogEntry, VerifyMethod};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use platform::{LoginMode, Platform};
pub use progress::{LoginEvent, ProgressSink, ProgressStream};
pub use task::{PublishOptions, PublishTask, TaskId, TaskPatch, TaskSpec, TaskStatus};

// Re-export adapter traits
pub use adapters::{
    BrowserError, BrowserProvider, CredentialClient, CredentialError, LoginPageId,
    PublishReceipt, PublishRequest, Publisher, PublisherError,
};
