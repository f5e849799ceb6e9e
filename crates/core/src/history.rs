// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only history records
//!
//! Both record kinds are immutable snapshots written exactly once. A
//! publish history row survives deletion of its account (the account
//! reference is nulled, never cascaded); verification-log rows are owned
//! by their account and go with it.

use crate::account::AccountId;
use crate::platform::Platform;
use crate::task::{TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of one execution attempt's terminal outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishHistoryRecord {
    pub id: String,
    pub task_id: Option<TaskId>,
    /// Nulled when the account is deleted; the row remains
    pub account_id: Option<AccountId>,
    pub platform: Platform,
    pub title: String,
    pub status: TaskStatus,
    pub video_id: Option<String>,
    pub video_url: Option<String>,
    pub error: Option<String>,
    pub published_at: DateTime<Utc>,
    pub duration_secs: u64,
}

/// How a credential verification was triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyMethod {
    /// Operator-triggered check
    Manual,
    /// Verification as part of a login or refresh flow
    Auto,
    /// Unattended refresh from the background scheduler
    Background,
}

/// Record of one credential verify/refresh attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationLogEntry {
    pub id: String,
    pub account_id: AccountId,
    pub platform: Platform,
    pub ok: bool,
    pub method: VerifyMethod,
    pub error: Option<String>,
    pub duration_ms: u64,
    pub verified_at: DateTime<Utc>,
}
