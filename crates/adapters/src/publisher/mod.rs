// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Publisher adapters

mod command;
#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use command::CommandPublisher;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeOutcome, FakePublisher};
