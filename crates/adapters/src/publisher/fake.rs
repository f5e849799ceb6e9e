// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake publisher for testing

use async_trait::async_trait;
use crosspost_core::{PublishReceipt, PublishRequest, Publisher, PublisherError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted outcome for one publish attempt
#[derive(Debug, Clone)]
pub enum FakeOutcome {
    Succeed(PublishReceipt),
    /// Platform-side failure, eligible for retry
    Fail(String),
    /// Helper breakage, never retried
    Break(String),
}

/// Fake publisher for testing
///
/// Attempts consume scripted outcomes front to back; once the script is
/// exhausted every attempt succeeds with a canned receipt.
#[derive(Clone, Default)]
pub struct FakePublisher {
    script: Arc<Mutex<VecDeque<FakeOutcome>>>,
    calls: Arc<Mutex<Vec<PublishRequest>>>,
}

impl FakePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an outcome for the next unscripted attempt
    pub fn push(&self, outcome: FakeOutcome) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(outcome);
    }

    /// Script `n` retryable failures before attempts start succeeding
    pub fn fail_times(&self, n: usize) {
        for _ in 0..n {
            self.push(FakeOutcome::Fail("scripted failure".to_string()));
        }
    }

    /// Get all recorded publish requests
    pub fn calls(&self) -> Vec<PublishRequest> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn canned_receipt(request: &PublishRequest) -> PublishReceipt {
        PublishReceipt {
            video_id: Some("fake-video".to_string()),
            video_url: Some(format!(
                "https://{}.example/video/fake-video",
                request.platform.as_str()
            )),
        }
    }
}

#[async_trait]
impl Publisher for FakePublisher {
    async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt, PublisherError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        let next = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        match next {
            Some(FakeOutcome::Succeed(receipt)) => Ok(receipt),
            Some(FakeOutcome::Fail(msg)) => Err(PublisherError::Failed(msg)),
            Some(FakeOutcome::Break(msg)) => Err(PublisherError::Helper(msg)),
            None => Ok(Self::canned_receipt(request)),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
