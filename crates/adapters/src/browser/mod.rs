// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Browser session providers
//!
//! The production provider lives in the browser automation helper and is
//! driven over its own protocol; tests run against the fake here.

#[cfg(any(test, feature = "test-support"))]
mod fake;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{BrowserCall, FakeBrowser};
