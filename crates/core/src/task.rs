// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Publish task state machine
//!
//! A task is one (account, media) publish unit. Status transitions are
//! monotonic except for the explicit manual-retry re-entry
//! (Failed → Pending); Success and Cancelled are terminal. A live task
//! must pass through Cancelled before its soft-delete flag can be set.

use crate::account::AccountId;
use crate::clock::Clock;
use crate::platform::Platform;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unique identifier for a publish task
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

/// The lifecycle status of a publish task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Running,
    Success,
    Failed,
    Cancelled,
}

impl TaskStatus {
    /// Whether the status accepts no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Cancelled)
    }

    /// Whether a task in this status counts as live (occupying the
    /// executor or waiting for it)
    pub fn is_live(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::Running)
    }

    /// The legal transition table. `Failed -> Pending` is the manual
    /// retry re-entry; live statuses may always be cancelled.
    pub fn can_transition(&self, to: TaskStatus) -> bool {
        use TaskStatus::*;
        matches!(
            (self, to),
            (Pending, Running)
                | (Pending, Cancelled)
                | (Running, Success)
                | (Running, Failed)
                | (Running, Cancelled)
                | (Failed, Pending)
        )
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Success => "success",
            TaskStatus::Failed => "failed",
            TaskStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// Platform-specific publish extras, carried opaquely to the publisher
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishOptions {
    pub category: Option<u32>,
    pub product_link: Option<String>,
    pub product_title: Option<String>,
    pub thumbnail: Option<PathBuf>,
    pub draft: bool,
}

/// Scheduling fields of a task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub enabled: bool,
    pub at: Option<DateTime<Utc>>,
}

/// A publish task record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishTask {
    pub id: TaskId,
    pub name: Option<String>,
    pub platform: Platform,
    pub account_id: AccountId,
    pub media_path: PathBuf,
    pub title: String,
    pub tags: Vec<String>,
    pub schedule: Schedule,
    pub status: TaskStatus,
    pub retry_count: u32,
    pub max_retries: u32,
    pub error: Option<String>,
    pub video_id: Option<String>,
    pub video_url: Option<String>,
    pub options: PublishOptions,
    pub deleted: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a new task
#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub name: Option<String>,
    pub platform: Platform,
    pub account_id: AccountId,
    pub media_path: PathBuf,
    pub title: String,
    pub tags: Vec<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub options: PublishOptions,
    pub max_retries: u32,
}

impl TaskSpec {
    pub fn new(
        platform: Platform,
        account_id: impl Into<AccountId>,
        media_path: impl Into<PathBuf>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            name: None,
            platform,
            account_id: account_id.into(),
            media_path: media_path.into(),
            title: title.into(),
            tags: Vec::new(),
            scheduled_at: None,
            options: PublishOptions::default(),
            max_retries: 3,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_schedule(mut self, at: DateTime<Utc>) -> Self {
        self.scheduled_at = Some(at);
        self
    }

    pub fn with_options(mut self, options: PublishOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Partial update applied alongside a status change
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub error: Option<String>,
    pub video_id: Option<String>,
    pub video_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl PublishTask {
    /// Create a new task in the Pending state
    pub fn new(id: impl Into<TaskId>, spec: TaskSpec, clock: &impl Clock) -> Self {
        let now = clock.now();
        PublishTask {
            id: id.into(),
            name: spec.name,
            platform: spec.platform,
            account_id: spec.account_id,
            media_path: spec.media_path,
            title: spec.title,
            tags: spec.tags,
            schedule: Schedule {
                enabled: spec.scheduled_at.is_some(),
                at: spec.scheduled_at,
            },
            status: TaskStatus::Pending,
            retry_count: 0,
            max_retries: spec.max_retries,
            error: None,
            video_id: None,
            video_url: None,
            options: spec.options,
            deleted: false,
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a status transition if the state machine allows it.
    /// Returns false (and leaves the task untouched) otherwise.
    pub fn try_set_status(&mut self, to: TaskStatus, clock: &impl Clock) -> bool {
        if !self.status.can_transition(to) {
            return false;
        }
        self.status = to;
        self.updated_at = clock.now();
        true
    }

    /// Apply the supplied partial fields; only present fields are written
    pub fn apply_patch(&mut self, patch: TaskPatch, clock: &impl Clock) {
        if let Some(error) = patch.error {
            self.error = Some(error);
        }
        if let Some(video_id) = patch.video_id {
            self.video_id = Some(video_id);
        }
        if let Some(video_url) = patch.video_url {
            self.video_url = Some(video_url);
        }
        if let Some(published_at) = patch.published_at {
            self.published_at = Some(published_at);
        }
        self.updated_at = clock.now();
    }

    /// Cancel unconditionally (terminal). No legality check by design:
    /// callers use this for operator-driven cancellation.
    pub fn cancel(&mut self, clock: &impl Clock) {
        self.status = TaskStatus::Cancelled;
        self.updated_at = clock.now();
    }

    /// Soft delete. A live task is forced to Cancelled before the flag
    /// is set; no task may be deleted while still live. Idempotent.
    pub fn soft_delete(&mut self, clock: &impl Clock) {
        if self.status.is_live() {
            self.status = TaskStatus::Cancelled;
        }
        self.deleted = true;
        self.updated_at = clock.now();
    }

    /// The instant to publish at, or None for "publish now"
    pub fn resolved_schedule(&self) -> Option<DateTime<Utc>> {
        if self.schedule.enabled {
            self.schedule.at
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
