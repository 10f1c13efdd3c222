// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process configuration read from the environment at startup.

use std::path::PathBuf;

use crate::env;
use crate::error::{ConfigError, LabelingError};
use crate::request::InstallerRequest;

/// Install configuration, immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    pub request: InstallerRequest,
    /// Directory the archive is unpacked into (not cleaned by us)
    pub install_dir: PathBuf,
}

impl InstallConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env::var)
    }

    /// Load using `lookup` in place of the process environment.
    ///
    /// All three installer variables must be present and non-empty; the
    /// error names every one that is not. The API URL must be absolute.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let api_url = required(env::API_URL);
        let token = required(env::PAAS_TOKEN);
        let options = required(env::ONEAGENT_OPTIONS);

        let (api_url, token, options) = match (api_url, token, options) {
            (Some(u), Some(t), Some(o)) => (u, t, o),
            (u, t, o) => {
                let missing = [(env::API_URL, u), (env::PAAS_TOKEN, t), (env::ONEAGENT_OPTIONS, o)]
                    .into_iter()
                    .filter(|(_, v)| v.is_none())
                    .map(|(name, _)| name)
                    .collect();
                return Err(ConfigError::Missing(missing));
            }
        };

        let request = InstallerRequest::new(api_url, token, options);
        // Reject unusable URLs before any network I/O
        request.url()?;

        Ok(Self { request, install_dir: env::install_dir(&lookup) })
    }
}

/// Identity of the pod running this process (Downward API).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodRef {
    pub name: String,
    pub namespace: String,
}

impl PodRef {
    pub fn from_env() -> Result<Self, LabelingError> {
        Self::from_lookup(env::var)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LabelingError> {
        let name = lookup(env::POD_NAME).filter(|v| !v.is_empty());
        let namespace = lookup(env::POD_NAMESPACE).filter(|v| !v.is_empty());
        match (name, namespace) {
            (Some(name), Some(namespace)) => Ok(Self { name, namespace }),
            _ => Err(LabelingError::MissingPodIdentity),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
