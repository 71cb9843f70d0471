// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::container::DEFAULT_LOADING_TIMEOUT;

pub const DEFAULT_USER: &str = "local";
const DEFAULT_POLL_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// SQLite file; `None` means the platform data dir.
    pub db_path: Option<PathBuf>,
    /// Base URL of a REST document store; takes precedence over SQLite.
    pub remote_url: Option<String>,
    pub auth_token: Option<String>,
    pub user: String,
    pub loading_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            remote_url: None,
            auth_token: None,
            user: DEFAULT_USER.to_string(),
            loading_timeout: DEFAULT_LOADING_TIMEOUT,
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| env::var(k).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();
        if let Some(p) = get("FINTRACK_DB") {
            cfg.db_path = Some(PathBuf::from(p));
        }
        cfg.remote_url = get("FINTRACK_REMOTE_URL");
        cfg.auth_token = get("FINTRACK_TOKEN");
        if let Some(u) = get("FINTRACK_USER") {
            cfg.user = u;
        }
        if let Some(s) = get("FINTRACK_LOADING_TIMEOUT_SECS") {
            let secs: u64 = s
                .parse()
                .with_context(|| format!("Invalid FINTRACK_LOADING_TIMEOUT_SECS '{}'", s))?;
            cfg.loading_timeout = Duration::from_secs(secs);
        }
        if let Some(s) = get("FINTRACK_POLL_SECS") {
            let secs: u64 = s
                .parse()
                .with_context(|| format!("Invalid FINTRACK_POLL_SECS '{}'", s))?;
            cfg.poll_interval = Duration::from_secs(secs.max(1));
        }
        Ok(cfg)
    }
}
