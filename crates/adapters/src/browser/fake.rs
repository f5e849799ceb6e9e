// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake browser session provider for testing

use async_trait::async_trait;
use crosspost_core::{BrowserError, BrowserProvider, LoginPageId, Platform};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded browser call
#[derive(Debug, Clone)]
pub enum BrowserCall {
    OpenLogin { platform: Platform },
    QrImage { page: String },
    WaitStateChange { page: String, timeout: Duration },
    ExportState { page: String, path: PathBuf },
    Close { page: String },
}

/// Fake browser session provider for testing
///
/// Pages open instantly and show a canned QR image. `navigate_after`
/// scripts when the login completes relative to `wait_state_change`;
/// `None` means the user never scans and the wait runs out.
#[derive(Clone)]
pub struct FakeBrowser {
    qr: Arc<Mutex<Option<String>>>,
    navigate_after: Arc<Mutex<Option<Duration>>>,
    state: Arc<Mutex<String>>,
    open: Arc<Mutex<HashSet<String>>>,
    closed: Arc<Mutex<Vec<String>>>,
    calls: Arc<Mutex<Vec<BrowserCall>>>,
    next_id: Arc<Mutex<u64>>,
}

impl Default for FakeBrowser {
    fn default() -> Self {
        Self {
            qr: Arc::new(Mutex::new(Some("data:image/png;base64,ZmFrZQ==".to_string()))),
            navigate_after: Arc::new(Mutex::new(Some(Duration::ZERO))),
            state: Arc::new(Mutex::new(r#"{"cookies":[]}"#.to_string())),
            open: Arc::new(Mutex::new(HashSet::new())),
            closed: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(Mutex::new(0)),
        }
    }
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the QR image, or `None` to present no code at all
    pub fn set_qr(&self, qr: Option<String>) {
        *self.qr.lock().unwrap_or_else(|e| e.into_inner()) = qr;
    }

    /// Script when the login completes; `None` means it never does
    pub fn set_navigate_after(&self, after: Option<Duration>) {
        *self.navigate_after.lock().unwrap_or_else(|e| e.into_inner()) = after;
    }

    /// Script the cookie state exported after login
    pub fn set_state(&self, state: impl Into<String>) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state.into();
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<BrowserCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Pages closed so far, in close order
    pub fn closed_pages(&self) -> Vec<String> {
        self.closed.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn open_page_count(&self) -> usize {
        self.open.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn record(&self, call: BrowserCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    fn check_open(&self, page: &LoginPageId) -> Result<(), BrowserError> {
        if self
            .open
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&page.0)
        {
            Ok(())
        } else {
            Err(BrowserError::PageNotFound(page.0.clone()))
        }
    }
}

#[async_trait]
impl BrowserProvider for FakeBrowser {
    async fn open_login(&self, platform: Platform) -> Result<LoginPageId, BrowserError> {
        self.record(BrowserCall::OpenLogin { platform });

        let id = {
            let mut next = self.next_id.lock().unwrap_or_else(|e| e.into_inner());
            *next += 1;
            format!("page-{}", *next)
        };
        self.open
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.clone());
        Ok(LoginPageId(id))
    }

    async fn qr_image(&self, page: &LoginPageId) -> Result<String, BrowserError> {
        self.record(BrowserCall::QrImage {
            page: page.0.clone(),
        });
        self.check_open(page)?;

        self.qr
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(BrowserError::NoQrCode)
    }

    async fn wait_state_change(
        &self,
        page: &LoginPageId,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        self.record(BrowserCall::WaitStateChange {
            page: page.0.clone(),
            timeout,
        });
        self.check_open(page)?;

        let after = *self.navigate_after.lock().unwrap_or_else(|e| e.into_inner());
        match after {
            Some(d) if d <= timeout => {
                tokio::time::sleep(d).await;
                Ok(())
            }
            _ => {
                tokio::time::sleep(timeout).await;
                Err(BrowserError::NavigationTimeout)
            }
        }
    }

    async fn export_state(&self, page: &LoginPageId, path: &Path) -> Result<(), BrowserError> {
        self.record(BrowserCall::ExportState {
            page: page.0.clone(),
            path: path.to_path_buf(),
        });
        self.check_open(page)?;

        let state = self.state.lock().unwrap_or_else(|e| e.into_inner()).clone();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, state)?;
        Ok(())
    }

    async fn close(&self, page: &LoginPageId) -> Result<(), BrowserError> {
        self.record(BrowserCall::Close {
            page: page.0.clone(),
        });

        // Closing an already-closed page is a no-op
        if self
            .open
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&page.0)
        {
            self.closed
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(page.0.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
