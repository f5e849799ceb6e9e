// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter trait definitions for external collaborators
//!
//! The platform automation itself (uploaders, browser control, credential
//! checks) lives outside this workspace; these traits are the stable
//! contracts the orchestration layer drives it through.

mod traits;

pub use traits::{
    BrowserError, BrowserProvider, CredentialClient, CredentialError, LoginPageId,
    PublishReceipt, PublishRequest, Publisher, PublisherError,
};
