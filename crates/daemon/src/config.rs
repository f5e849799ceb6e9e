// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration
//!
//! Loaded from a TOML file. Durations accept humantime strings such as
//! `"10m"` or `"30s"`.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Daemon configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root of the JSON row store
    pub data_dir: PathBuf,
    /// Where credential (cookie) files live
    pub cookies_dir: PathBuf,
    /// Where the daemon log lands
    pub log_dir: PathBuf,
    #[serde(default)]
    pub scheduler: SchedulerSection,
    /// Helper program that verifies and renews platform sessions
    pub credentials_helper: HelperSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerSection {
    #[serde(with = "humantime_serde", default = "default_check_interval")]
    pub check_interval: Duration,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(with = "humantime_serde", default = "default_error_backoff")]
    pub error_backoff: Duration,
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            check_interval: default_check_interval(),
            concurrency: default_concurrency(),
            error_backoff: default_error_backoff(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HelperSection {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_check_interval() -> Duration {
    Duration::from_secs(600)
}

fn default_concurrency() -> usize {
    1
}

fn default_error_backoff() -> Duration {
    Duration::from_secs(30)
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
