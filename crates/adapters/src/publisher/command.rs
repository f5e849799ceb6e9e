// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess publisher adapter
//!
//! Runs a configured helper program per publish attempt. The request is
//! written to the helper's stdin as one JSON document; the helper reports
//! back with one JSON object on stdout:
//!
//! ```json
//! {"ok": true, "video_id": "7301...", "video_url": "https://..."}
//! {"ok": false, "error": "upload rejected"}
//! ```
//!
//! A non-zero exit is treated as a platform-side failure and is eligible
//! for retry; malformed output means the helper itself is broken.

use async_trait::async_trait;
use crosspost_core::{PublishReceipt, PublishRequest, Publisher, PublisherError};
use serde::Deserialize;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Debug, Deserialize)]
struct HelperReply {
    ok: bool,
    #[serde(default)]
    video_id: Option<String>,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Publisher that shells out to an uploader helper
#[derive(Clone)]
pub struct CommandPublisher {
    program: String,
    args: Vec<String>,
}

impl CommandPublisher {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl Publisher for CommandPublisher {
    async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt, PublisherError> {
        let payload = serde_json::to_string(request)
            .map_err(|e| PublisherError::Helper(format!("request encode: {e}")))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg("publish")
            .arg(request.platform.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(payload.as_bytes()).await?;
            // Drop closes the pipe so the helper sees EOF
        }

        let output = child.wait_with_output().await?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = if stderr.trim().is_empty() {
                format!("helper exited with {}", output.status)
            } else {
                stderr.trim().to_string()
            };
            tracing::warn!(
                platform = %request.platform,
                status = %output.status,
                "publish helper reported failure"
            );
            return Err(PublisherError::Failed(detail));
        }

        // The helper may log to stdout before the reply; the reply is the
        // last non-empty line
        let reply_line = stdout
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .ok_or_else(|| PublisherError::Helper("helper produced no reply".to_string()))?;

        let reply: HelperReply = serde_json::from_str(reply_line)
            .map_err(|e| PublisherError::Helper(format!("unparseable helper reply: {e}")))?;

        if !reply.ok {
            return Err(PublisherError::Failed(
                reply.error.unwrap_or_else(|| "unspecified failure".to_string()),
            ));
        }

        Ok(PublishReceipt {
            video_id: reply.video_id,
            video_url: reply.video_url,
        })
    }
}
