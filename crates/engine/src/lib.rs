// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! crosspost orchestration engine
//!
//! Owns the task lifecycle, the retrying executor, the credential
//! registry, the login orchestrator, and the background refresh
//! scheduler. Platform automation stays behind the adapter traits.

mod executor;
mod login;
mod pipeline;
mod refresh;
mod registry;
mod scheduler;
mod sessions;

pub use executor::{ExecutorConfig, TaskExecutor};
pub use login::{LoginConfig, LoginOrchestrator};
pub use pipeline::{BatchSpec, SchedulePadding, TaskFilter, TaskPipeline};
pub use refresh::{RefreshDetail, RefreshService, RefreshSummary};
pub use registry::{AccountFilter, AccountPatch, AccountStatistics, CredentialRegistry};
pub use scheduler::{RefreshScheduler, SchedulerConfig};
pub use sessions::ManualSessionRegistry;
