// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential client adapters

mod command;
#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use command::CommandCredentialClient;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{CredentialCall, FakeCredentialClient};
