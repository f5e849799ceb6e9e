// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess credential client
//!
//! Drives a helper program with `verify` and `renew` subcommands. The
//! verify exit code carries the verdict: 0 means the credential still
//! authenticates, 1 means it does not, anything else means the helper
//! itself failed.

use async_trait::async_trait;
use crosspost_core::{CredentialClient, CredentialError, Platform};
use std::path::Path;
use tokio::process::Command;

/// Credential client that shells out to a browser helper
#[derive(Clone)]
pub struct CommandCredentialClient {
    program: String,
    args: Vec<String>,
}

impl CommandCredentialClient {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl CredentialClient for CommandCredentialClient {
    async fn verify(
        &self,
        platform: Platform,
        credential: &Path,
    ) -> Result<bool, CredentialError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg("verify")
            .arg(platform.as_str())
            .arg(credential)
            .output()
            .await?;

        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(CredentialError::Helper(stderr.trim().to_string()))
            }
        }
    }

    async fn renew(
        &self,
        platform: Platform,
        credential: &Path,
        out: &Path,
    ) -> Result<(), CredentialError> {
        if !platform.supports_silent_renewal() {
            return Err(CredentialError::RenewalUnsupported(platform));
        }

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg("renew")
            .arg(platform.as_str())
            .arg(credential)
            .arg(out)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CredentialError::RenewalFailed(stderr.trim().to_string()));
        }

        // The renewed state must actually be on disk
        if !out.exists() {
            return Err(CredentialError::RenewalFailed(
                "helper reported success but wrote no state".to_string(),
            ));
        }

        Ok(())
    }
}
