// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External collaborator contracts

use crate::platform::Platform;
use crate::task::PublishOptions;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Publisher
// =============================================================================

/// Everything a platform uploader needs for one publish attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishRequest {
    pub platform: Platform,
    pub title: String,
    pub media_path: PathBuf,
    pub tags: Vec<String>,
    /// None means "publish now"
    pub schedule: Option<DateTime<Utc>>,
    /// On-disk path of the credential (cookie) file
    pub credential_path: PathBuf,
    pub options: PublishOptions,
}

/// What a successful publish reports back
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub video_id: Option<String>,
    pub video_url: Option<String>,
}

/// Errors from the external publisher
#[derive(Debug, Error)]
pub enum PublisherError {
    /// The platform rejected or aborted the publish (retryable)
    #[error("publish failed: {0}")]
    Failed(String),
    /// The automation helper itself misbehaved
    #[error("helper error: {0}")]
    Helper(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The platform-specific publishing capability
#[async_trait]
pub trait Publisher: Clone + Send + Sync + 'static {
    async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt, PublisherError>;
}

// =============================================================================
// Credential client
// =============================================================================

/// Errors from credential verification and renewal
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("silent renewal unsupported for {0}")]
    RenewalUnsupported(Platform),
    #[error("renewal failed: {0}")]
    RenewalFailed(String),
    #[error("helper error: {0}")]
    Helper(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Validity checks and unattended renewal of stored credentials
#[async_trait]
pub trait CredentialClient: Clone + Send + Sync + 'static {
    /// Check whether the stored credential still authenticates
    async fn verify(&self, platform: Platform, credential: &Path)
        -> Result<bool, CredentialError>;

    /// Re-establish the platform session from an existing credential and
    /// write the renewed state to `out`. Only meaningful for platforms
    /// with `supports_silent_renewal()`.
    async fn renew(
        &self,
        platform: Platform,
        credential: &Path,
        out: &Path,
    ) -> Result<(), CredentialError>;
}

// =============================================================================
// Browser session provider
// =============================================================================

/// Handle to an open login page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoginPageId(pub String);

impl std::fmt::Display for LoginPageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors from the browser session provider
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("login page not found: {0}")]
    PageNotFound(String),
    #[error("no qr code presented")]
    NoQrCode,
    /// The page never left the login URL within the bound
    #[error("navigation timed out")]
    NavigationTimeout,
    #[error("browser error: {0}")]
    Other(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The headless-browser mechanism, abstracted. Implementations drive the
/// actual login pages; the orchestrator only sequences them.
#[async_trait]
pub trait BrowserProvider: Clone + Send + Sync + 'static {
    /// Open the platform's login page
    async fn open_login(&self, platform: Platform) -> Result<LoginPageId, BrowserError>;

    /// Fetch the QR image reference currently shown on the page
    async fn qr_image(&self, page: &LoginPageId) -> Result<String, BrowserError>;

    /// Resolve once the page navigates away from the login URL, or fail
    /// with `NavigationTimeout` when the bound elapses first
    async fn wait_state_change(
        &self,
        page: &LoginPageId,
        timeout: Duration,
    ) -> Result<(), BrowserError>;

    /// Persist the session's cookie state to the given file
    async fn export_state(&self, page: &LoginPageId, path: &Path) -> Result<(), BrowserError>;

    /// Close the page and its browser context
    async fn close(&self, page: &LoginPageId) -> Result<(), BrowserError>;
}
