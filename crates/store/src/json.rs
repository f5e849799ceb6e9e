// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON file-based row store
//!
//! One file per row under `{accounts,tasks,history,verify_log}/<id>.json`.
//! The store is the single source of truth for account and task state;
//! writers always persist whole rows, so conflicting writes serialize on
//! the filesystem rename.

use crate::StoreError;
use crosspost_core::{
    Account, AccountId, PublishHistoryRecord, PublishTask, TaskId, VerificationLogEntry,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::PathBuf;

const ACCOUNTS: &str = "accounts";
const TASKS: &str = "tasks";
const HISTORY: &str = "history";
const VERIFY_LOG: &str = "verify_log";

/// JSON file-based store
#[derive(Clone)]
pub struct JsonStore {
    base_path: PathBuf,
}

impl JsonStore {
    /// Open a store rooted at the given path
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    /// Open a throwaway store for testing
    pub fn open_temp() -> Result<Self, StoreError> {
        let temp_dir =
            std::env::temp_dir().join(format!("crosspost-test-{}", uuid::Uuid::new_v4()));
        Self::open(temp_dir)
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    // -------------------------------------------------------------------------
    // Accounts
    // -------------------------------------------------------------------------

    pub fn put_account(&self, account: &Account) -> Result<(), StoreError> {
        self.save(ACCOUNTS, &account.id.0, account)
    }

    pub fn account(&self, id: &AccountId) -> Result<Account, StoreError> {
        self.load(ACCOUNTS, &id.0)
    }

    /// All accounts, newest first
    pub fn accounts(&self) -> Result<Vec<Account>, StoreError> {
        let mut accounts: Vec<Account> = self.list(ACCOUNTS)?;
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(accounts)
    }

    /// Delete an account with the domain's foreign-key semantics:
    /// tasks and verification-log rows cascade, history rows keep
    /// existing with their account reference nulled.
    pub fn delete_account(&self, id: &AccountId) -> Result<(), StoreError> {
        // Existence check first so a bad id is a clean NotFound
        let _: Account = self.load(ACCOUNTS, &id.0)?;

        let tasks: Vec<PublishTask> = self.list(TASKS)?;
        for task in tasks.iter().filter(|t| &t.account_id == id) {
            self.remove(TASKS, &task.id.0)?;
        }

        let entries: Vec<VerificationLogEntry> = self.list(VERIFY_LOG)?;
        for entry in entries.iter().filter(|e| &e.account_id == id) {
            self.remove(VERIFY_LOG, &entry.id)?;
        }

        let history: Vec<PublishHistoryRecord> = self.list(HISTORY)?;
        for mut record in history {
            if record.account_id.as_ref() == Some(id) {
                record.account_id = None;
                self.save(HISTORY, &record.id.clone(), &record)?;
            }
        }

        self.remove(ACCOUNTS, &id.0)
    }

    // -------------------------------------------------------------------------
    // Tasks
    // -------------------------------------------------------------------------

    pub fn put_task(&self, task: &PublishTask) -> Result<(), StoreError> {
        self.save(TASKS, &task.id.0, task)
    }

    pub fn task(&self, id: &TaskId) -> Result<PublishTask, StoreError> {
        self.load(TASKS, &id.0)
    }

    /// All tasks, newest first
    pub fn tasks(&self) -> Result<Vec<PublishTask>, StoreError> {
        let mut tasks: Vec<PublishTask> = self.list(TASKS)?;
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    // -------------------------------------------------------------------------
    // Publish history (append-only)
    // -------------------------------------------------------------------------

    pub fn append_history(&self, record: &PublishHistoryRecord) -> Result<(), StoreError> {
        self.save(HISTORY, &record.id, record)
    }

    /// All history rows, newest first
    pub fn history(&self) -> Result<Vec<PublishHistoryRecord>, StoreError> {
        let mut records: Vec<PublishHistoryRecord> = self.list(HISTORY)?;
        records.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(records)
    }

    pub fn history_for_account(
        &self,
        id: &AccountId,
        limit: usize,
    ) -> Result<Vec<PublishHistoryRecord>, StoreError> {
        let mut records = self.history()?;
        records.retain(|r| r.account_id.as_ref() == Some(id));
        records.truncate(limit);
        Ok(records)
    }

    pub fn history_for_task(&self, id: &TaskId) -> Result<Vec<PublishHistoryRecord>, StoreError> {
        let mut records = self.history()?;
        records.retain(|r| r.task_id.as_ref() == Some(id));
        Ok(records)
    }

    // -------------------------------------------------------------------------
    // Credential verification log (append-only)
    // -------------------------------------------------------------------------

    pub fn append_verification(&self, entry: &VerificationLogEntry) -> Result<(), StoreError> {
        self.save(VERIFY_LOG, &entry.id, entry)
    }

    pub fn verifications_for_account(
        &self,
        id: &AccountId,
        limit: usize,
    ) -> Result<Vec<VerificationLogEntry>, StoreError> {
        let mut entries: Vec<VerificationLogEntry> = self.list(VERIFY_LOG)?;
        entries.retain(|e| &e.account_id == id);
        entries.sort_by(|a, b| b.verified_at.cmp(&a.verified_at));
        entries.truncate(limit);
        Ok(entries)
    }

    // -------------------------------------------------------------------------
    // Row plumbing
    // -------------------------------------------------------------------------

    fn save<T: Serialize>(&self, kind: &str, id: &str, data: &T) -> Result<(), StoreError> {
        let path = self.path_for(kind, id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(data)?;
        // Write-then-rename so readers never observe a half-written row
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, kind: &str, id: &str) -> Result<T, StoreError> {
        let path = self.path_for(kind, id);
        if !path.exists() {
            return Err(StoreError::NotFound {
                kind: kind.to_string(),
                id: id.to_string(),
            });
        }
        let json = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn list<T: DeserializeOwned>(&self, kind: &str) -> Result<Vec<T>, StoreError> {
        let dir = self.base_path.join(kind);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut rows = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let json = fs::read_to_string(&path)?;
                rows.push(serde_json::from_str(&json)?);
            }
        }
        Ok(rows)
    }

    fn remove(&self, kind: &str, id: &str) -> Result<(), StoreError> {
        let path = self.path_for(kind, id);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn path_for(&self, kind: &str, id: &str) -> PathBuf {
        self.base_path.join(kind).join(format!("{id}.json"))
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
