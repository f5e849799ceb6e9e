// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Login orchestrator
//!
//! One entry point for every platform login mode. QR platforms run
//! unattended against the browser provider; manual platforms suspend on
//! a confirmation signal fired from another execution context; upload
//! only platforms are refused here. Each invocation emits ordered
//! progress events and exactly one terminal event, and never retries on
//! its own.

use crate::registry::{AccountPatch, CredentialRegistry};
use crate::sessions::ManualSessionRegistry;
use crosspost_core::{
    Account, AccountId, AccountSpec, BrowserError, BrowserProvider, Clock, CredentialClient,
    CredentialHandle, Error, IdGen, LoginEvent, LoginMode, LoginPageId, Platform, ProgressSink,
};
use std::path::PathBuf;
use std::time::Duration;

/// Login flow bounds and credential placement
#[derive(Debug, Clone)]
pub struct LoginConfig {
    /// How long a QR login may wait for the page to leave the login URL
    pub qr_wait: Duration,
    /// How long a manual login may wait for its confirmation signal
    pub manual_wait: Duration,
    /// Where exported credential files land
    pub cookies_dir: PathBuf,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            qr_wait: Duration::from_secs(200),
            manual_wait: Duration::from_secs(600),
            cookies_dir: PathBuf::from("cookies"),
        }
    }
}

/// Drives interactive and unattended login flows
#[derive(Clone)]
pub struct LoginOrchestrator<B, V, C, G>
where
    B: BrowserProvider,
    V: CredentialClient,
    C: Clock,
    G: IdGen,
{
    browser: B,
    credentials: V,
    registry: CredentialRegistry<C, G>,
    sessions: ManualSessionRegistry,
    clock: C,
    ids: G,
    config: LoginConfig,
}

// Removes the manual session when the invocation exits, whatever the path
struct SessionGuard {
    sessions: ManualSessionRegistry,
    id: String,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions.remove(&self.id);
    }
}

impl<B, V, C, G> LoginOrchestrator<B, V, C, G>
where
    B: BrowserProvider,
    V: CredentialClient,
    C: Clock,
    G: IdGen,
{
    pub fn new(
        browser: B,
        credentials: V,
        registry: CredentialRegistry<C, G>,
        clock: C,
        ids: G,
        config: LoginConfig,
    ) -> Self {
        Self {
            browser,
            credentials,
            registry,
            sessions: ManualSessionRegistry::new(),
            clock,
            ids,
            config,
        }
    }

    /// Run one login for `platform` and report progress through `sink`
    ///
    /// With `account_id` this is a refresh of an existing account;
    /// without it a successful login creates a new one. `session_id`
    /// only matters for manual platforms, where a caller may pick the id
    /// it will later confirm with.
    pub async fn login_platform(
        &self,
        platform: Platform,
        account_name: &str,
        sink: &ProgressSink,
        account_id: Option<&AccountId>,
        session_id: Option<String>,
    ) -> Result<Account, Error> {
        let session_id = match platform.login_mode() {
            LoginMode::Manual => Some(session_id.unwrap_or_else(|| self.ids.next())),
            _ => None,
        };

        sink.push(LoginEvent::Start {
            platform,
            account_name: account_name.to_string(),
            session_id: session_id.clone(),
        });

        let result = self
            .login_inner(platform, account_name, sink, account_id, session_id)
            .await;

        match &result {
            Ok(account) => sink.push(LoginEvent::Success {
                account_id: account.id.clone(),
                credential: account.credential.clone(),
            }),
            Err(err) => sink.push(LoginEvent::Error {
                message: err.to_string(),
            }),
        }
        result
    }

    /// Fire a pending manual session's confirmation signal
    ///
    /// Callable from any execution context. Unknown or already-consumed
    /// ids return false.
    pub fn confirm_session(&self, session_id: &str) -> bool {
        let hit = self.sessions.confirm(session_id);
        tracing::info!(session_id, hit, "manual session confirmation");
        hit
    }

    #[cfg(test)]
    pub(crate) fn session_count(&self) -> usize {
        self.sessions.len()
    }

    async fn login_inner(
        &self,
        platform: Platform,
        account_name: &str,
        sink: &ProgressSink,
        account_id: Option<&AccountId>,
        session_id: Option<String>,
    ) -> Result<Account, Error> {
        let credential = match platform.login_mode() {
            LoginMode::Qr => self.qr_flow(platform, sink).await?,
            LoginMode::Manual => {
                // session_id is always resolved for manual platforms
                let session_id = session_id.unwrap_or_else(|| self.ids.next());
                self.manual_flow(platform, sink, session_id).await?
            }
            LoginMode::UploadOnly => {
                return Err(Error::Unsupported(format!(
                    "{platform} has no login flow, use direct credential upload"
                )));
            }
        };

        let credential_path = self.config.cookies_dir.join(&credential.0);
        let valid = self
            .credentials
            .verify(platform, &credential_path)
            .await
            .map_err(|e| Error::External(e.to_string()))?;
        if !valid {
            return Err(Error::CredentialInvalid(format!(
                "fresh login for {platform} failed verification"
            )));
        }

        let account = match account_id {
            Some(id) => self.registry.update(
                id,
                AccountPatch {
                    credential: Some(credential),
                    ..Default::default()
                },
            )?,
            None => self.registry.create(AccountSpec::new(
                platform,
                credential,
                account_name,
            ))?,
        };
        self.registry.record_verification(&account.id, true)?;
        let account = self.registry.schedule_next_refresh(&account.id)?;
        tracing::info!(
            account_id = %account.id,
            platform = %platform,
            "login completed"
        );
        Ok(account)
    }

    /// Automated login: show the QR, wait for the page to move on, then
    /// export the session state
    async fn qr_flow(
        &self,
        platform: Platform,
        sink: &ProgressSink,
    ) -> Result<CredentialHandle, Error> {
        let page = self
            .browser
            .open_login(platform)
            .await
            .map_err(map_browser)?;

        let result = self.qr_flow_on_page(&page, sink).await;
        self.close_page(&page).await;
        result
    }

    async fn qr_flow_on_page(
        &self,
        page: &LoginPageId,
        sink: &ProgressSink,
    ) -> Result<CredentialHandle, Error> {
        let img = self.browser.qr_image(page).await.map_err(map_browser)?;
        sink.push(LoginEvent::Qrcode { img });

        self.browser
            .wait_state_change(page, self.config.qr_wait)
            .await
            .map_err(map_browser)?;

        self.export_credential(page).await
    }

    /// Manual login: a human completes the opened page and confirms
    /// out-of-band before we may export anything
    async fn manual_flow(
        &self,
        platform: Platform,
        sink: &ProgressSink,
        session_id: String,
    ) -> Result<CredentialHandle, Error> {
        let page = self
            .browser
            .open_login(platform)
            .await
            .map_err(map_browser)?;

        let result = self.manual_flow_on_page(&page, sink, session_id).await;
        self.close_page(&page).await;
        result
    }

    async fn manual_flow_on_page(
        &self,
        page: &LoginPageId,
        sink: &ProgressSink,
        session_id: String,
    ) -> Result<CredentialHandle, Error> {
        let confirmed = self.sessions.register(session_id.as_str(), self.clock.now());
        let _guard = SessionGuard {
            sessions: self.sessions.clone(),
            id: session_id.clone(),
        };

        sink.push(LoginEvent::ManualRequired {
            session_id: session_id.clone(),
        });

        match tokio::time::timeout(self.config.manual_wait, confirmed).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => {
                // The sender vanished without firing: another invocation
                // re-registered this session id
                return Err(Error::validation(format!(
                    "manual session {session_id} superseded"
                )));
            }
            Err(_) => {
                return Err(Error::Timeout(format!(
                    "manual session {session_id} not confirmed within {:?}",
                    self.config.manual_wait
                )));
            }
        }

        self.export_credential(page).await
    }

    async fn export_credential(&self, page: &LoginPageId) -> Result<CredentialHandle, Error> {
        let handle = CredentialHandle(format!("{}.json", self.ids.next()));
        let path = self.config.cookies_dir.join(&handle.0);
        self.browser
            .export_state(page, &path)
            .await
            .map_err(map_browser)?;
        Ok(handle)
    }

    async fn close_page(&self, page: &LoginPageId) {
        if let Err(err) = self.browser.close(page).await {
            tracing::warn!(page = %page, error = %err, "login page close failed");
        }
    }
}

fn map_browser(err: BrowserError) -> Error {
    match err {
        BrowserError::NavigationTimeout => {
            Error::Timeout("login page never left the login URL".to_string())
        }
        other => Error::External(other.to_string()),
    }
}

#[cfg(test)]
#[path = "login_tests.rs"]
mod tests;
