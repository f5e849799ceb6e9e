// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Managed account records
//!
//! An account ties a platform to a stored credential (session-cookie
//! state) plus the bookkeeping the registry and refresh scheduler rely
//! on: verification status, usage counters, and the refresh schedule.
//! History rows reference accounts softly and outlive them.

use crate::clock::Clock;
use crate::platform::Platform;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for an account
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        AccountId(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        AccountId(s.to_string())
    }
}

/// Opaque reference to a stored session/cookie state, usable to
/// authenticate against a platform. In practice: a file name under the
/// cookies directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredentialHandle(pub String);

impl std::fmt::Display for CredentialHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CredentialHandle {
    fn from(s: String) -> Self {
        CredentialHandle(s)
    }
}

impl From<&str> for CredentialHandle {
    fn from(s: &str) -> Self {
        CredentialHandle(s.to_string())
    }
}

/// Verification status of an account's credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Invalid,
    Valid,
    /// A verification or background refresh is in flight
    Verifying,
}

/// A managed account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub platform: Platform,
    pub credential: CredentialHandle,
    pub name: String,
    pub status: AccountStatus,
    pub last_verified_at: Option<DateTime<Utc>>,
    pub verify_count: u32,
    pub auto_refresh: bool,
    pub refresh_interval_days: u32,
    pub next_refresh_at: Option<DateTime<Utc>>,
    pub publish_count: u32,
    pub success_count: u32,
    pub fail_count: u32,
    pub last_used_at: Option<DateTime<Utc>>,
    pub group_id: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a new account
#[derive(Debug, Clone)]
pub struct AccountSpec {
    pub platform: Platform,
    pub credential: CredentialHandle,
    pub name: String,
    pub status: AccountStatus,
    pub auto_refresh: bool,
    pub refresh_interval_days: u32,
    pub group_id: Option<String>,
    pub tags: Vec<String>,
}

impl AccountSpec {
    pub fn new(
        platform: Platform,
        credential: impl Into<CredentialHandle>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            credential: credential.into(),
            name: name.into(),
            status: AccountStatus::Invalid,
            auto_refresh: true,
            refresh_interval_days: 7,
            group_id: None,
            tags: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: AccountStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_auto_refresh(mut self, enabled: bool) -> Self {
        self.auto_refresh = enabled;
        self
    }

    pub fn with_refresh_interval_days(mut self, days: u32) -> Self {
        self.refresh_interval_days = days;
        self
    }

    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

impl Account {
    /// Create a new account. Computes the first refresh time when
    /// auto-refresh is enabled; usage counters start at zero.
    pub fn new(id: impl Into<AccountId>, spec: AccountSpec, clock: &impl Clock) -> Self {
        let now = clock.now();
        let next_refresh_at = spec
            .auto_refresh
            .then(|| now + Duration::days(i64::from(spec.refresh_interval_days)));

        Account {
            id: id.into(),
            platform: spec.platform,
            credential: spec.credential,
            name: spec.name,
            status: spec.status,
            last_verified_at: None,
            verify_count: 0,
            auto_refresh: spec.auto_refresh,
            refresh_interval_days: spec.refresh_interval_days,
            next_refresh_at,
            publish_count: 0,
            success_count: 0,
            fail_count: 0,
            last_used_at: None,
            group_id: spec.group_id,
            tags: spec.tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record the outcome of a credential verification
    pub fn record_verification(&mut self, ok: bool, clock: &impl Clock) {
        let now = clock.now();
        self.status = if ok {
            AccountStatus::Valid
        } else {
            AccountStatus::Invalid
        };
        self.last_verified_at = Some(now);
        self.verify_count += 1;
        self.updated_at = now;
    }

    /// Record a publish attempt against this account
    pub fn record_usage(&mut self, ok: bool, clock: &impl Clock) {
        let now = clock.now();
        self.publish_count += 1;
        if ok {
            self.success_count += 1;
        } else {
            self.fail_count += 1;
        }
        self.last_used_at = Some(now);
        self.updated_at = now;
    }

    /// Recompute the next refresh time from the configured interval.
    /// No-op when auto-refresh is disabled.
    pub fn schedule_next_refresh(&mut self, clock: &impl Clock) {
        if !self.auto_refresh {
            return;
        }
        let now = clock.now();
        self.next_refresh_at = Some(now + Duration::days(i64::from(self.refresh_interval_days)));
        self.updated_at = now;
    }

    /// The sole predicate the refresh scheduler selects on
    pub fn is_due_for_refresh(&self, now: DateTime<Utc>) -> bool {
        self.auto_refresh && self.next_refresh_at.is_some_and(|t| t <= now)
    }

    /// Publish success rate in percent, 0.0 when unused
    pub fn success_rate(&self) -> f64 {
        if self.publish_count == 0 {
            return 0.0;
        }
        f64::from(self.success_count) / f64::from(self.publish_count) * 100.0
    }
}

#[cfg(test)]
#[path = "account_tests.rs"]
mod tests;
