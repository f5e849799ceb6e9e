// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retrying task executor
//!
//! Drives one publish attempt for one task. Only publisher-reported
//! failures are retried, with a bounded backoff ladder; every other
//! failure is terminal on first sight. One history row is written per
//! call, for the final outcome, never per retry step.

use crate::registry::CredentialRegistry;
use crosspost_core::{
    Clock, Error, IdGen, PublishHistoryRecord, PublishRequest, PublishTask, Publisher,
    PublisherError, TaskId, TaskPatch, TaskStatus,
};
use crosspost_store::JsonStore;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Executor knobs
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Root for relative media references
    pub media_dir: PathBuf,
    /// Root for credential (cookie) files
    pub cookies_dir: PathBuf,
    /// Backoff per retry; the last entry repeats when attempts outnumber it
    pub retry_delays: Vec<Duration>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            media_dir: PathBuf::from("media"),
            cookies_dir: PathBuf::from("cookies"),
            retry_delays: vec![
                Duration::from_secs(1),
                Duration::from_secs(5),
                Duration::from_secs(30),
            ],
        }
    }
}

/// Executes pending tasks against the external publisher
#[derive(Clone)]
pub struct TaskExecutor<P: Publisher, C: Clock, G: IdGen> {
    store: JsonStore,
    registry: CredentialRegistry<C, G>,
    publisher: P,
    clock: C,
    ids: G,
    config: ExecutorConfig,
}

impl<P: Publisher, C: Clock, G: IdGen> TaskExecutor<P, C, G> {
    pub fn new(
        store: JsonStore,
        registry: CredentialRegistry<C, G>,
        publisher: P,
        clock: C,
        ids: G,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            store,
            registry,
            publisher,
            clock,
            ids,
            config,
        }
    }

    /// Run one task to a terminal publish outcome
    ///
    /// Refuses tasks that are not Pending; that guard serializes execution
    /// per task and makes double-dispatch harmless. The returned task is
    /// in Success or Failed state.
    pub async fn execute(&self, id: &TaskId) -> Result<PublishTask, Error> {
        let mut task = self.store.task(id)?;
        if task.status != TaskStatus::Pending {
            return Err(Error::validation(format!(
                "task {} is {:?}, not pending",
                id, task.status
            )));
        }

        task.try_set_status(TaskStatus::Running, &self.clock);
        self.store.put_task(&task)?;
        tracing::info!(task_id = %id, platform = %task.platform, "executing task");
        let started = std::time::Instant::now();

        // Fail fast on anything the publisher cannot possibly work with
        let account = match self.registry.get(&task.account_id) {
            Ok(account) => account,
            Err(_) => {
                return self
                    .finish_failed(task, "account not found", started, false)
                    .await;
            }
        };

        let media_path = resolve(&self.config.media_dir, &task.media_path);
        if !media_path.exists() {
            return self
                .finish_failed(task, "media file missing on disk", started, true)
                .await;
        }

        let credential_path = resolve(&self.config.cookies_dir, Path::new(&account.credential.0));
        if !credential_path.exists() {
            return self
                .finish_failed(task, "credential file missing on disk", started, true)
                .await;
        }

        let request = PublishRequest {
            platform: task.platform,
            title: task.title.clone(),
            media_path,
            tags: task.tags.clone(),
            schedule: task.resolved_schedule(),
            credential_path,
            options: task.options.clone(),
        };

        let mut attempt: u32 = 0;
        loop {
            match self.publisher.publish(&request).await {
                Ok(receipt) => {
                    task.try_set_status(TaskStatus::Success, &self.clock);
                    task.apply_patch(
                        TaskPatch {
                            video_id: receipt.video_id,
                            video_url: receipt.video_url,
                            published_at: Some(self.clock.now()),
                            ..Default::default()
                        },
                        &self.clock,
                    );
                    self.store.put_task(&task)?;
                    self.record_usage(&task, true);
                    self.append_history(&task, started);
                    tracing::info!(
                        task_id = %id,
                        retries = task.retry_count,
                        "publish succeeded"
                    );
                    return Ok(task);
                }
                Err(PublisherError::Failed(msg)) if attempt < task.max_retries => {
                    task.retry_count += 1;
                    self.store.put_task(&task)?;

                    let delay = backoff(&self.config.retry_delays, attempt);
                    tracing::warn!(
                        task_id = %id,
                        attempt = attempt + 1,
                        delay_secs = delay.as_secs(),
                        error = %msg,
                        "publish failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    let terminal = matches!(err, PublisherError::Failed(_));
                    let msg = if terminal {
                        format!("retries exhausted: {err}")
                    } else {
                        err.to_string()
                    };
                    return self.finish_failed(task, &msg, started, true).await;
                }
            }
        }
    }

    async fn finish_failed(
        &self,
        mut task: PublishTask,
        message: &str,
        started: std::time::Instant,
        charge_account: bool,
    ) -> Result<PublishTask, Error> {
        task.try_set_status(TaskStatus::Failed, &self.clock);
        task.apply_patch(
            TaskPatch {
                error: Some(message.to_string()),
                ..Default::default()
            },
            &self.clock,
        );
        self.store.put_task(&task)?;
        if charge_account {
            self.record_usage(&task, false);
        }
        self.append_history(&task, started);
        tracing::warn!(task_id = %task.id, error = message, "publish failed");
        Ok(task)
    }

    // Usage counters are bookkeeping; a publish outcome never fails over them
    fn record_usage(&self, task: &PublishTask, ok: bool) {
        if let Err(err) = self.registry.record_usage(&task.account_id, ok) {
            tracing::warn!(
                account_id = %task.account_id,
                error = %err,
                "usage counter update failed"
            );
        }
    }

    fn append_history(&self, task: &PublishTask, started: std::time::Instant) {
        let record = PublishHistoryRecord {
            id: self.ids.next(),
            task_id: Some(task.id.clone()),
            account_id: Some(task.account_id.clone()),
            platform: task.platform,
            title: task.title.clone(),
            status: task.status,
            video_id: task.video_id.clone(),
            video_url: task.video_url.clone(),
            error: task.error.clone(),
            published_at: self.clock.now(),
            duration_secs: started.elapsed().as_secs(),
        };
        if let Err(err) = self.store.append_history(&record) {
            tracing::warn!(task_id = %task.id, error = %err, "history append failed");
        }
    }
}

fn resolve(root: &Path, reference: &Path) -> PathBuf {
    if reference.is_absolute() {
        reference.to_path_buf()
    } else {
        root.join(reference)
    }
}

fn backoff(delays: &[Duration], attempt: u32) -> Duration {
    let index = (attempt as usize).min(delays.len().saturating_sub(1));
    delays.get(index).copied().unwrap_or(Duration::from_secs(1))
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
