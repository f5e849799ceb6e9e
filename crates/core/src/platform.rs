// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Platform catalog
//!
//! Every supported platform and the login interaction it requires. The
//! login mode decides which orchestrator flow applies and whether the
//! background scheduler may renew credentials unattended.

use serde::{Deserialize, Serialize};

/// A supported publishing platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Xiaohongshu,
    WeixinChannels,
    Douyin,
    Kuaishou,
    Bilibili,
    Baijiahao,
    Tiktok,
}

/// How a platform's login is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    /// Automated login; the page presents a QR code and the flow polls
    /// for the post-login navigation
    Qr,
    /// No scriptable login; a human completes it in an attended browser
    /// and confirms out-of-band
    Manual,
    /// No login flow at all; credentials arrive by direct upload
    UploadOnly,
}

impl Platform {
    pub const ALL: [Platform; 7] = [
        Platform::Xiaohongshu,
        Platform::WeixinChannels,
        Platform::Douyin,
        Platform::Kuaishou,
        Platform::Bilibili,
        Platform::Baijiahao,
        Platform::Tiktok,
    ];

    pub fn login_mode(&self) -> LoginMode {
        match self {
            Platform::Xiaohongshu
            | Platform::WeixinChannels
            | Platform::Douyin
            | Platform::Kuaishou => LoginMode::Qr,
            Platform::Baijiahao | Platform::Tiktok => LoginMode::Manual,
            Platform::Bilibili => LoginMode::UploadOnly,
        }
    }

    /// Whether an existing credential can be renewed without a human.
    /// Only QR platforms keep a renewable browser session state.
    pub fn supports_silent_renewal(&self) -> bool {
        self.login_mode() == LoginMode::Qr
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Xiaohongshu => "xiaohongshu",
            Platform::WeixinChannels => "weixin_channels",
            Platform::Douyin => "douyin",
            Platform::Kuaishou => "kuaishou",
            Platform::Bilibili => "bilibili",
            Platform::Baijiahao => "baijiahao",
            Platform::Tiktok => "tiktok",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for unknown platform names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

impl std::str::FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}

#[cfg(test)]
#[path = "platform_tests.rs"]
mod tests;
