// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the platform automation helpers
//!
//! The uploaders and browser automation run out of process; the command
//! adapters here shell out to them, and the fakes stand in for them in
//! tests.

pub mod browser;
pub mod credential;
pub mod publisher;

pub use credential::CommandCredentialClient;
pub use publisher::CommandPublisher;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use browser::{BrowserCall, FakeBrowser};
#[cfg(any(test, feature = "test-support"))]
pub use credential::{CredentialCall, FakeCredentialClient};
#[cfg(any(test, feature = "test-support"))]
pub use publisher::{FakeOutcome, FakePublisher};
