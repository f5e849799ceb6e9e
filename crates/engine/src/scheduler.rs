// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential refresh scheduler
//!
//! One long-lived loop: find due accounts, refresh them as a batch,
//! sleep, repeat. The sleep is sliced so a stop signal lands within a
//! second; a batch already dispatched always runs to completion.

use crate::refresh::{RefreshService, RefreshSummary};
use crate::registry::CredentialRegistry;
use crosspost_core::{AccountId, Clock, CredentialClient, Error, IdGen};
use std::time::Duration;
use tokio::sync::watch;

/// Scheduler knobs
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Pause between refresh cycles
    pub check_interval: Duration,
    /// Cap on concurrently running refreshes inside one batch
    pub concurrency: usize,
    /// Pause after a cycle that failed outright
    pub error_backoff: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(600),
            concurrency: 1,
            error_backoff: Duration::from_secs(30),
        }
    }
}

/// Background loop that keeps credentials fresh
#[derive(Clone)]
pub struct RefreshScheduler<V: CredentialClient, C: Clock, G: IdGen> {
    registry: CredentialRegistry<C, G>,
    service: RefreshService<V, C, G>,
    config: SchedulerConfig,
}

impl<V, C, G> RefreshScheduler<V, C, G>
where
    V: CredentialClient,
    C: Clock + 'static,
    G: IdGen + 'static,
{
    pub fn new(
        registry: CredentialRegistry<C, G>,
        service: RefreshService<V, C, G>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            registry,
            service,
            config,
        }
    }

    /// Run until `stop` turns true. Returns only after the current cycle
    /// (including any in-flight batch) has finished.
    pub async fn run(&self, mut stop: watch::Receiver<bool>) {
        tracing::info!(
            check_interval_secs = self.config.check_interval.as_secs(),
            concurrency = self.config.concurrency,
            "refresh scheduler started"
        );

        loop {
            if *stop.borrow() {
                break;
            }

            let pause = match self.cycle().await {
                Ok(None) => self.config.check_interval,
                Ok(Some(summary)) => {
                    tracing::info!(
                        total = summary.total,
                        succeeded = summary.succeeded,
                        failed = summary.failed,
                        "refresh cycle finished"
                    );
                    self.config.check_interval
                }
                Err(err) => {
                    tracing::warn!(error = %err, "refresh cycle failed");
                    self.config.error_backoff
                }
            };

            if sleep_interruptible(pause, &mut stop).await {
                break;
            }
        }

        tracing::info!("refresh scheduler stopped");
    }

    /// One pass: refresh whatever is due right now
    ///
    /// `None` means nothing was due and no work happened.
    pub async fn cycle(&self) -> Result<Option<RefreshSummary>, Error> {
        let due = self.registry.find_due_for_refresh()?;
        if due.is_empty() {
            return Ok(None);
        }

        tracing::info!(due = due.len(), "accounts due for refresh");
        let ids: Vec<AccountId> = due.into_iter().map(|a| a.id).collect();
        let summary = self.service.refresh_batch(&ids, self.config.concurrency).await;
        Ok(Some(summary))
    }
}

/// Sleep in one-second slices; true means stop was requested
async fn sleep_interruptible(total: Duration, stop: &mut watch::Receiver<bool>) -> bool {
    let mut remaining = total;
    while remaining > Duration::ZERO {
        let step = remaining.min(Duration::from_secs(1));
        tokio::select! {
            _ = tokio::time::sleep(step) => {
                remaining = remaining.saturating_sub(step);
            }
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    return true;
                }
            }
        }
    }
    false
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
