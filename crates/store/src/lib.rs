// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! crosspost-store: the durable store
//!
//! JSON-file row storage for accounts, publish tasks, publish history,
//! and the credential verification log, with the foreign-key semantics
//! the domain requires: deleting an account cascades its tasks and
//! verification-log rows but only nulls the account reference on history
//! rows, which are append-only and outlive the account.

mod json;

pub use json::JsonStore;

use thiserror::Error;

/// Errors from the store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("not found: {kind}/{id}")]
    NotFound { kind: String, id: String },
}

impl From<StoreError> for crosspost_core::Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, id } => {
                crosspost_core::Error::NotFound(format!("{kind}/{id}"))
            }
            other => crosspost_core::Error::Storage(other.to_string()),
        }
    }
}
