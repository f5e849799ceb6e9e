// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task pipeline
//!
//! Owns task creation, batch fan-out, and status transitions. The state
//! machine lives on [`TaskStatus`]; this layer enforces it at the store
//! boundary and rejects illegal transitions before anything is written.

use chrono::{DateTime, Utc};
use crosspost_core::{
    AccountId, Clock, Error, IdGen, Platform, PublishOptions, PublishTask, TaskId, TaskPatch,
    TaskSpec, TaskStatus,
};
use crosspost_store::JsonStore;
use std::path::PathBuf;

/// How a batch handles fewer scheduled times than media items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulePadding {
    /// Replicate the last scheduled time over the remaining media.
    /// Documented policy carried over from the original scheduling
    /// behavior, not an accident.
    #[default]
    RepeatLast,
    /// Reject the batch when the lists disagree in length
    Strict,
}

/// One batch of tasks: every account gets every media item
#[derive(Debug, Clone)]
pub struct BatchSpec {
    pub platform: Platform,
    pub accounts: Vec<String>,
    pub media: Vec<PathBuf>,
    pub title: String,
    pub tags: Vec<String>,
    pub options: PublishOptions,
    pub max_retries: u32,
    /// Indexed by media position; empty means publish now
    pub scheduled_times: Vec<DateTime<Utc>>,
    pub padding: SchedulePadding,
}

impl BatchSpec {
    pub fn new(platform: Platform, title: impl Into<String>) -> Self {
        Self {
            platform,
            accounts: Vec::new(),
            media: Vec::new(),
            title: title.into(),
            tags: Vec::new(),
            options: PublishOptions::default(),
            max_retries: 3,
            scheduled_times: Vec::new(),
            padding: SchedulePadding::default(),
        }
    }
}

/// Listing criteria; empty fields match everything
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub platform: Option<Platform>,
    pub account_id: Option<AccountId>,
    /// Empty set matches any status
    pub statuses: Vec<TaskStatus>,
    pub include_deleted: bool,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl TaskFilter {
    fn matches(&self, task: &PublishTask) -> bool {
        if !self.include_deleted && task.deleted {
            return false;
        }
        if self.platform.is_some_and(|p| p != task.platform) {
            return false;
        }
        if let Some(account) = &self.account_id {
            if *account != task.account_id {
                return false;
            }
        }
        self.statuses.is_empty() || self.statuses.contains(&task.status)
    }
}

/// Task creation and lifecycle management
#[derive(Clone)]
pub struct TaskPipeline<C: Clock, G: IdGen> {
    store: JsonStore,
    clock: C,
    ids: G,
}

impl<C: Clock, G: IdGen> TaskPipeline<C, G> {
    pub fn new(store: JsonStore, clock: C, ids: G) -> Self {
        Self { store, clock, ids }
    }

    /// Create one task in the Pending state
    pub fn create(&self, spec: TaskSpec) -> Result<PublishTask, Error> {
        validate_spec(&spec)?;

        let task = PublishTask::new(self.ids.next(), spec, &self.clock);
        self.store.put_task(&task)?;
        tracing::info!(task_id = %task.id, platform = %task.platform, "task created");
        Ok(task)
    }

    /// Fan a batch out into accounts x media tasks
    ///
    /// Iteration is media-outer, account-inner, so the returned ids group
    /// by media item and each media item keeps its scheduled time across
    /// all accounts.
    pub fn create_batch(&self, batch: BatchSpec) -> Result<Vec<TaskId>, Error> {
        if batch.accounts.is_empty() {
            return Err(Error::validation("batch has no accounts"));
        }
        if batch.media.is_empty() {
            return Err(Error::validation("batch has no media"));
        }
        if batch.padding == SchedulePadding::Strict
            && !batch.scheduled_times.is_empty()
            && batch.scheduled_times.len() < batch.media.len()
        {
            return Err(Error::validation(format!(
                "{} scheduled times for {} media items",
                batch.scheduled_times.len(),
                batch.media.len()
            )));
        }

        let mut ids = Vec::with_capacity(batch.accounts.len() * batch.media.len());
        for (index, media) in batch.media.iter().enumerate() {
            let scheduled = schedule_for_index(&batch.scheduled_times, index);
            for account in &batch.accounts {
                let mut spec = TaskSpec::new(
                    batch.platform,
                    account.as_str(),
                    media.clone(),
                    batch.title.clone(),
                )
                .with_tags(batch.tags.clone())
                .with_options(batch.options.clone())
                .with_max_retries(batch.max_retries);
                if let Some(at) = scheduled {
                    spec = spec.with_schedule(at);
                }
                let task = self.create(spec)?;
                ids.push(task.id);
            }
        }

        tracing::info!(
            platform = %batch.platform,
            tasks = ids.len(),
            "batch created"
        );
        Ok(ids)
    }

    pub fn get(&self, id: &TaskId) -> Result<PublishTask, Error> {
        Ok(self.store.task(id)?)
    }

    /// Matching tasks, newest first; `offset`/`limit` page the result
    pub fn list(&self, filter: &TaskFilter) -> Result<Vec<PublishTask>, Error> {
        let mut tasks = self.store.tasks()?;
        tasks.retain(|t| filter.matches(t));
        let tasks: Vec<PublishTask> = tasks
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit.unwrap_or(usize::MAX))
            .collect();
        Ok(tasks)
    }

    /// Matching task total, ignoring pagination
    pub fn count(&self, filter: &TaskFilter) -> Result<usize, Error> {
        let tasks = self.store.tasks()?;
        Ok(tasks.iter().filter(|t| filter.matches(t)).count())
    }

    /// Pending tasks whose scheduled time (if any) has passed, oldest first
    pub fn pending(&self, limit: Option<usize>) -> Result<Vec<PublishTask>, Error> {
        let now = self.clock.now();
        let mut tasks = self.store.tasks()?;
        tasks.retain(|t| {
            !t.deleted
                && t.status == TaskStatus::Pending
                && t.resolved_schedule().is_none_or(|at| at <= now)
        });
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        tasks.truncate(limit.unwrap_or(usize::MAX));
        Ok(tasks)
    }

    /// Apply a status transition plus a partial field update
    ///
    /// Illegal transitions leave the task untouched.
    pub fn update_status(
        &self,
        id: &TaskId,
        status: TaskStatus,
        patch: TaskPatch,
    ) -> Result<PublishTask, Error> {
        let mut task = self.store.task(id)?;
        if !task.try_set_status(status, &self.clock) {
            return Err(Error::validation(format!(
                "illegal transition {:?} -> {:?} for task {}",
                task.status, status, id
            )));
        }
        task.apply_patch(patch, &self.clock);
        self.store.put_task(&task)?;
        Ok(task)
    }

    /// Cancel regardless of current status; terminal
    pub fn cancel(&self, id: &TaskId) -> Result<PublishTask, Error> {
        let mut task = self.store.task(id)?;
        task.cancel(&self.clock);
        self.store.put_task(&task)?;
        tracing::info!(task_id = %id, "task cancelled");
        Ok(task)
    }

    /// Soft-delete; live tasks are forced to Cancelled first. Idempotent.
    pub fn soft_delete(&self, id: &TaskId) -> Result<PublishTask, Error> {
        let mut task = self.store.task(id)?;
        task.soft_delete(&self.clock);
        self.store.put_task(&task)?;
        Ok(task)
    }
}

fn validate_spec(spec: &TaskSpec) -> Result<(), Error> {
    if spec.account_id.0.trim().is_empty() {
        return Err(Error::validation("account is required"));
    }
    if spec.media_path.as_os_str().is_empty() {
        return Err(Error::validation("media is required"));
    }
    if spec.title.trim().is_empty() {
        return Err(Error::validation("title is required"));
    }
    Ok(())
}

fn schedule_for_index(times: &[DateTime<Utc>], index: usize) -> Option<DateTime<Utc>> {
    if times.is_empty() {
        return None;
    }
    times.get(index).or(times.last()).copied()
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
