// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential registry
//!
//! Account CRUD, verification bookkeeping, and refresh-due selection.
//! Bookkeeping writes from the executor path are best-effort by design;
//! callers there log and move on rather than failing a publish over a
//! counter update.

use crosspost_core::{
    Account, AccountId, AccountSpec, AccountStatus, Clock, CredentialHandle, Error, IdGen,
    Platform, VerificationLogEntry,
};
use crosspost_store::JsonStore;
use std::collections::HashMap;

/// Partial account update; only supplied fields are written
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub credential: Option<CredentialHandle>,
    pub status: Option<AccountStatus>,
    pub auto_refresh: Option<bool>,
    pub refresh_interval_days: Option<u32>,
    pub group_id: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

/// Listing criteria; empty fields match everything
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    pub platform: Option<Platform>,
    pub status: Option<AccountStatus>,
    pub group_id: Option<String>,
    /// Case-insensitive substring match against the account name
    pub keyword: Option<String>,
}

impl AccountFilter {
    fn matches(&self, account: &Account) -> bool {
        if self.platform.is_some_and(|p| p != account.platform) {
            return false;
        }
        if self.status.is_some_and(|s| s != account.status) {
            return false;
        }
        if let Some(group) = &self.group_id {
            if account.group_id.as_deref() != Some(group.as_str()) {
                return false;
            }
        }
        if let Some(keyword) = &self.keyword {
            let name = account.name.to_lowercase();
            if !name.contains(&keyword.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// Aggregate numbers over the whole registry
#[derive(Debug, Clone, PartialEq)]
pub struct AccountStatistics {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub by_platform: HashMap<Platform, usize>,
    pub total_publishes: u64,
    pub total_successes: u64,
}

/// Account and credential lifecycle bookkeeping
#[derive(Clone)]
pub struct CredentialRegistry<C: Clock, G: IdGen> {
    store: JsonStore,
    clock: C,
    ids: G,
}

impl<C: Clock, G: IdGen> CredentialRegistry<C, G> {
    pub fn new(store: JsonStore, clock: C, ids: G) -> Self {
        Self { store, clock, ids }
    }

    /// Create an account; the first refresh is due one interval from now
    /// when auto-refresh is enabled
    pub fn create(&self, spec: AccountSpec) -> Result<Account, Error> {
        if spec.name.trim().is_empty() {
            return Err(Error::validation("account name is required"));
        }
        if spec.credential.0.trim().is_empty() {
            return Err(Error::validation("credential reference is required"));
        }

        let account = Account::new(self.ids.next(), spec, &self.clock);
        self.store.put_account(&account)?;
        tracing::info!(
            account_id = %account.id,
            platform = %account.platform,
            "account created"
        );
        Ok(account)
    }

    pub fn get(&self, id: &AccountId) -> Result<Account, Error> {
        Ok(self.store.account(id)?)
    }

    /// Matching accounts, newest first
    pub fn list(&self, filter: &AccountFilter) -> Result<Vec<Account>, Error> {
        let mut accounts = self.store.accounts()?;
        accounts.retain(|a| filter.matches(a));
        Ok(accounts)
    }

    pub fn update(&self, id: &AccountId, patch: AccountPatch) -> Result<Account, Error> {
        let mut account = self.store.account(id)?;

        if let Some(name) = patch.name {
            account.name = name;
        }
        if let Some(credential) = patch.credential {
            account.credential = credential;
        }
        if let Some(status) = patch.status {
            account.status = status;
        }
        if let Some(group_id) = patch.group_id {
            account.group_id = group_id;
        }
        if let Some(tags) = patch.tags {
            account.tags = tags;
        }

        let refresh_changed =
            patch.auto_refresh.is_some() || patch.refresh_interval_days.is_some();
        if let Some(enabled) = patch.auto_refresh {
            account.auto_refresh = enabled;
        }
        if let Some(days) = patch.refresh_interval_days {
            account.refresh_interval_days = days;
        }
        if refresh_changed {
            if account.auto_refresh {
                account.schedule_next_refresh(&self.clock);
            } else {
                account.next_refresh_at = None;
            }
        }

        account.updated_at = self.clock.now();
        self.store.put_account(&account)?;
        Ok(account)
    }

    /// Delete an account. History rows survive with their reference
    /// nulled; tasks and verification-log rows go with the account.
    pub fn delete(&self, id: &AccountId) -> Result<(), Error> {
        self.store.delete_account(id)?;
        tracing::info!(account_id = %id, "account deleted");
        Ok(())
    }

    /// Record a verification outcome: status, timestamp, counter
    pub fn record_verification(&self, id: &AccountId, ok: bool) -> Result<Account, Error> {
        let mut account = self.store.account(id)?;
        account.record_verification(ok, &self.clock);
        self.store.put_account(&account)?;
        Ok(account)
    }

    /// Record a publish outcome against the account's usage counters
    pub fn record_usage(&self, id: &AccountId, ok: bool) -> Result<Account, Error> {
        let mut account = self.store.account(id)?;
        account.record_usage(ok, &self.clock);
        self.store.put_account(&account)?;
        Ok(account)
    }

    /// Push the account's next refresh one interval out from now
    pub fn schedule_next_refresh(&self, id: &AccountId) -> Result<Account, Error> {
        let mut account = self.store.account(id)?;
        account.schedule_next_refresh(&self.clock);
        self.store.put_account(&account)?;
        Ok(account)
    }

    /// Set or clear the transient Verifying marker around a refresh
    pub fn set_status(&self, id: &AccountId, status: AccountStatus) -> Result<Account, Error> {
        let mut account = self.store.account(id)?;
        account.status = status;
        account.updated_at = self.clock.now();
        self.store.put_account(&account)?;
        Ok(account)
    }

    /// Accounts whose next refresh has come due, soonest first
    ///
    /// Pure selection; reading never mutates refresh state.
    pub fn find_due_for_refresh(&self) -> Result<Vec<Account>, Error> {
        let now = self.clock.now();
        let mut due = self.store.accounts()?;
        due.retain(|a| a.is_due_for_refresh(now));
        due.sort_by_key(|a| a.next_refresh_at);
        Ok(due)
    }

    pub fn statistics(&self) -> Result<AccountStatistics, Error> {
        let accounts = self.store.accounts()?;
        let mut stats = AccountStatistics {
            total: accounts.len(),
            valid: 0,
            invalid: 0,
            by_platform: HashMap::new(),
            total_publishes: 0,
            total_successes: 0,
        };
        for account in &accounts {
            match account.status {
                AccountStatus::Valid => stats.valid += 1,
                AccountStatus::Invalid => stats.invalid += 1,
                AccountStatus::Verifying => {}
            }
            *stats.by_platform.entry(account.platform).or_insert(0) += 1;
            stats.total_publishes += u64::from(account.publish_count);
            stats.total_successes += u64::from(account.success_count);
        }
        Ok(stats)
    }

    /// Append one verification-log row
    pub fn append_verification(&self, entry: &VerificationLogEntry) -> Result<(), Error> {
        Ok(self.store.append_verification(entry)?)
    }

    /// Verification history for one account, newest first
    pub fn verification_log(
        &self,
        id: &AccountId,
        limit: usize,
    ) -> Result<Vec<VerificationLogEntry>, Error> {
        Ok(self.store.verifications_for_account(id, limit)?)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
