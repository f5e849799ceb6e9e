// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error taxonomy for the orchestration layer
//!
//! Components return typed results at their boundaries; the executor
//! recovers [`Error::External`] through its retry policy, everything else
//! is terminal on first occurrence.

use thiserror::Error;

/// Errors surfaced by the orchestration components
#[derive(Debug, Error)]
pub enum Error {
    /// Bad input; the operation had no side effects
    #[error("validation error: {0}")]
    Validation(String),
    /// A referenced task or account does not exist
    #[error("not found: {0}")]
    NotFound(String),
    /// A credential failed the platform's validity check
    #[error("credential invalid: {0}")]
    CredentialInvalid(String),
    /// A login, confirmation, or network bound was exceeded
    #[error("timed out: {0}")]
    Timeout(String),
    /// The external publisher reported a failure (retryable)
    #[error("publish failed: {0}")]
    External(String),
    /// The platform does not support the requested mode
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    /// The durable store failed
    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// True for failures the executor's retry policy may recover
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::External(_))
    }
}
