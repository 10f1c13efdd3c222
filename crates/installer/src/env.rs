// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the installer.

use std::path::PathBuf;
use std::time::Duration;

/// Base URL of the tenant API, e.g. `https://abc.live.dynatrace.com/api`.
pub const API_URL: &str = "DT_API_URL";
/// PaaS token sent as the `Api-Token` query parameter.
pub const PAAS_TOKEN: &str = "DT_PAAS_TOKEN";
/// Ampersand-delimited `key=value` installer options.
pub const ONEAGENT_OPTIONS: &str = "DT_ONEAGENT_OPTIONS";
/// Downward API: name of the pod running the init container.
pub const POD_NAME: &str = "POD_NAME";
/// Downward API: namespace of the pod running the init container.
pub const POD_NAMESPACE: &str = "POD_NAMESPACE";
/// Overrides [`DEFAULT_INSTALL_DIR`].
pub const INSTALL_DIR: &str = "ONEAGENT_INSTALL_DIR";
pub const CONNECT_TIMEOUT_MS: &str = "ONEAGENT_CONNECT_TIMEOUT_MS";
pub const DOWNLOAD_TIMEOUT_MS: &str = "ONEAGENT_DOWNLOAD_TIMEOUT_MS";

/// Shared volume the main container mounts.
pub const DEFAULT_INSTALL_DIR: &str = "/opt/dynatrace/oneagent";

/// Read a variable, treating an empty value as unset.
pub fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Target directory: `ONEAGENT_INSTALL_DIR` > `/opt/dynatrace/oneagent`
pub fn install_dir(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    lookup(INSTALL_DIR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INSTALL_DIR))
}

/// TCP connect timeout for the installer download (default 10s).
pub fn connect_timeout(lookup: impl Fn(&str) -> Option<String>) -> Duration {
    millis(lookup(CONNECT_TIMEOUT_MS)).unwrap_or(Duration::from_secs(10))
}

/// Upper bound on the whole download, body included (default 300s).
pub fn download_timeout(lookup: impl Fn(&str) -> Option<String>) -> Duration {
    millis(lookup(DOWNLOAD_TIMEOUT_MS)).unwrap_or(Duration::from_secs(300))
}

fn millis(raw: Option<String>) -> Option<Duration> {
    raw.and_then(|s| s.trim().parse::<u64>().ok()).map(Duration::from_millis)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
