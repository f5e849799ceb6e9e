// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake credential client for testing

use async_trait::async_trait;
use crosspost_core::{CredentialClient, CredentialError, Platform};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Recorded credential call
#[derive(Debug, Clone)]
pub enum CredentialCall {
    Verify {
        platform: Platform,
        credential: PathBuf,
    },
    Renew {
        platform: Platform,
        credential: PathBuf,
        out: PathBuf,
    },
}

/// Fake credential client for testing
///
/// Credentials are valid unless marked otherwise. `renew` honors the
/// platform's silent-renewal capability and writes a stub state file to
/// the output path so downstream existence checks hold.
#[derive(Clone, Default)]
pub struct FakeCredentialClient {
    invalid: Arc<Mutex<HashMap<PathBuf, bool>>>,
    renew_error: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<Vec<CredentialCall>>>,
}

impl FakeCredentialClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a credential path as (in)valid for subsequent verifies
    pub fn set_valid(&self, credential: impl Into<PathBuf>, valid: bool) {
        self.invalid
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(credential.into(), !valid);
    }

    /// Make every renewal fail with the given message
    pub fn fail_renewal(&self, message: impl Into<String>) {
        *self.renew_error.lock().unwrap_or_else(|e| e.into_inner()) = Some(message.into());
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<CredentialCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn verify_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|c| matches!(c, CredentialCall::Verify { .. }))
            .count()
    }
}

#[async_trait]
impl CredentialClient for FakeCredentialClient {
    async fn verify(
        &self,
        platform: Platform,
        credential: &Path,
    ) -> Result<bool, CredentialError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(CredentialCall::Verify {
                platform,
                credential: credential.to_path_buf(),
            });

        let invalid = self.invalid.lock().unwrap_or_else(|e| e.into_inner());
        Ok(!invalid.get(credential).copied().unwrap_or(false))
    }

    async fn renew(
        &self,
        platform: Platform,
        credential: &Path,
        out: &Path,
    ) -> Result<(), CredentialError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(CredentialCall::Renew {
                platform,
                credential: credential.to_path_buf(),
                out: out.to_path_buf(),
            });

        if !platform.supports_silent_renewal() {
            return Err(CredentialError::RenewalUnsupported(platform));
        }

        if let Some(msg) = self
            .renew_error
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return Err(CredentialError::RenewalFailed(msg));
        }

        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(out, b"{}")?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
