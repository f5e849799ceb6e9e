// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background credential refresh
//!
//! Unattended renewal of stored sessions. Only platforms with silent
//! renewal qualify; everything else is reported as unsupported rather
//! than silently falling back to an interactive login. Every attempted
//! refresh appends exactly one verification-log row.

use crate::registry::{AccountPatch, CredentialRegistry};
use crosspost_core::{
    Account, AccountId, AccountStatus, Clock, CredentialClient, CredentialHandle, Error, IdGen,
    VerificationLogEntry, VerifyMethod,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Outcome of one batch of refreshes
#[derive(Debug, Clone)]
pub struct RefreshSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub details: Vec<RefreshDetail>,
}

/// Per-account outcome inside a batch
#[derive(Debug, Clone)]
pub struct RefreshDetail {
    pub account_id: AccountId,
    pub ok: bool,
    pub error: Option<String>,
}

/// Renews credentials without a human in the loop
#[derive(Clone)]
pub struct RefreshService<V: CredentialClient, C: Clock, G: IdGen> {
    registry: CredentialRegistry<C, G>,
    credentials: V,
    clock: C,
    ids: G,
    cookies_dir: PathBuf,
}

impl<V, C, G> RefreshService<V, C, G>
where
    V: CredentialClient,
    C: Clock + 'static,
    G: IdGen + 'static,
{
    pub fn new(
        registry: CredentialRegistry<C, G>,
        credentials: V,
        clock: C,
        ids: G,
        cookies_dir: PathBuf,
    ) -> Self {
        Self {
            registry,
            credentials,
            clock,
            ids,
            cookies_dir,
        }
    }

    /// Refresh one account's credential in place
    ///
    /// Unsupported platforms are rejected before any state changes and
    /// leave no verification-log row; an attempted refresh always leaves
    /// exactly one.
    pub async fn refresh_account(&self, id: &AccountId) -> Result<Account, Error> {
        let account = self.registry.get(id)?;
        if !account.platform.supports_silent_renewal() {
            return Err(Error::Unsupported(format!(
                "{} does not support unattended renewal",
                account.platform
            )));
        }

        self.registry.set_status(id, AccountStatus::Verifying)?;
        tracing::info!(account_id = %id, platform = %account.platform, "refreshing credential");

        let started = std::time::Instant::now();
        let result = self.renew_and_verify(&account).await;

        self.registry.append_verification(&VerificationLogEntry {
            id: self.ids.next(),
            account_id: id.clone(),
            platform: account.platform,
            ok: result.is_ok(),
            method: VerifyMethod::Background,
            error: result.as_ref().err().map(|e| e.to_string()),
            duration_ms: started.elapsed().as_millis() as u64,
            verified_at: self.clock.now(),
        })?;

        match result {
            Ok(credential) => {
                self.registry.update(
                    id,
                    AccountPatch {
                        credential: Some(credential),
                        ..Default::default()
                    },
                )?;
                self.registry.record_verification(id, true)?;
                let account = self.registry.schedule_next_refresh(id)?;
                tracing::info!(account_id = %id, "credential refreshed");
                Ok(account)
            }
            Err(err) => {
                // Also clears the transient Verifying marker
                self.registry.record_verification(id, false)?;
                tracing::warn!(account_id = %id, error = %err, "credential refresh failed");
                Err(err)
            }
        }
    }

    async fn renew_and_verify(&self, account: &Account) -> Result<CredentialHandle, Error> {
        let current = self.cookies_dir.join(&account.credential.0);
        let handle = CredentialHandle(format!("{}.json", self.ids.next()));
        let renewed = self.cookies_dir.join(&handle.0);

        self.credentials
            .renew(account.platform, &current, &renewed)
            .await
            .map_err(|e| Error::External(e.to_string()))?;

        let valid = self
            .credentials
            .verify(account.platform, &renewed)
            .await
            .map_err(|e| Error::External(e.to_string()))?;
        if !valid {
            return Err(Error::CredentialInvalid(format!(
                "renewed session for {} failed verification",
                account.platform
            )));
        }

        Ok(handle)
    }

    /// Refresh many accounts with a concurrency cap
    ///
    /// One account's failure never aborts the rest; every account shows
    /// up in the summary's details, in input order.
    pub async fn refresh_batch(&self, ids: &[AccountId], concurrency: usize) -> RefreshSummary {
        let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
        let mut handles = Vec::with_capacity(ids.len());

        for id in ids {
            let service = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return RefreshDetail {
                            account_id: id,
                            ok: false,
                            error: Some("refresh pool closed".to_string()),
                        };
                    }
                };
                match service.refresh_account(&id).await {
                    Ok(_) => RefreshDetail {
                        account_id: id,
                        ok: true,
                        error: None,
                    },
                    Err(err) => RefreshDetail {
                        account_id: id,
                        ok: false,
                        error: Some(err.to_string()),
                    },
                }
            }));
        }

        let mut details = Vec::with_capacity(handles.len());
        for (index, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(detail) => details.push(detail),
                Err(err) => details.push(RefreshDetail {
                    account_id: ids[index].clone(),
                    ok: false,
                    error: Some(format!("refresh task panicked: {err}")),
                }),
            }
        }

        let succeeded = details.iter().filter(|d| d.ok).count();
        let summary = RefreshSummary {
            total: details.len(),
            succeeded,
            failed: details.len() - succeeded,
            details,
        };
        tracing::info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "refresh batch finished"
        );
        summary
    }
}

#[cfg(test)]
#[path = "refresh_tests.rs"]
mod tests;
