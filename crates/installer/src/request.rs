// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Installer download request: URL and query construction.

use std::fmt;

use indexmap::IndexMap;
use reqwest::Url;

use crate::error::ConfigError;

/// Installer resource path, appended to the API base URL.
pub const INSTALLER_PATH: &str = "/v1/deployment/installer/agent/unix/paas/latest";

/// Query parameter carrying the PaaS token.
pub const TOKEN_PARAM: &str = "Api-Token";

const REDACTED: &str = "***";

/// Everything needed to ask the tenant API for the installer.
#[derive(Clone, PartialEq, Eq)]
pub struct InstallerRequest {
    api_url: String,
    token: String,
    options: String,
}

impl InstallerRequest {
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        options: impl Into<String>,
    ) -> Self {
        Self { api_url: api_url.into(), token: token.into(), options: options.into() }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn options(&self) -> &str {
        &self.options
    }

    /// Base URL joined with [`INSTALLER_PATH`], without query.
    pub fn endpoint(&self) -> String {
        let base = self.api_url.strip_suffix('/').unwrap_or(&self.api_url);
        format!("{}{}", base, INSTALLER_PATH)
    }

    /// Query parameters in send order: the token, then every parsed option.
    ///
    /// A later duplicate key replaces the earlier value in place, so an option
    /// named `Api-Token` overrides the configured token.
    pub fn query(&self) -> IndexMap<String, String> {
        let mut params = IndexMap::new();
        params.insert(TOKEN_PARAM.to_string(), self.token.clone());
        params.extend(parse_options(&self.options));
        params
    }

    /// Full download URL, token included.
    pub fn url(&self) -> Result<Url, ConfigError> {
        self.build_url(self.query())
    }

    /// Download URL safe for logs.
    pub fn redacted_url(&self) -> Result<Url, ConfigError> {
        let mut params = self.query();
        if let Some(token) = params.get_mut(TOKEN_PARAM) {
            *token = REDACTED.to_string();
        }
        self.build_url(params)
    }

    fn build_url(&self, params: IndexMap<String, String>) -> Result<Url, ConfigError> {
        Url::parse_with_params(&self.endpoint(), &params).map_err(|e| ConfigError::InvalidUrl {
            url: self.api_url.clone(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Debug for InstallerRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallerRequest")
            .field("api_url", &self.api_url)
            .field("token", &REDACTED)
            .field("options", &self.options)
            .finish()
    }
}

/// Parse an ampersand-delimited `key=value` option string.
///
/// Each segment is split on its first `=`; segments without one are dropped.
pub fn parse_options(options: &str) -> IndexMap<String, String> {
    options
        .split('&')
        .filter_map(|segment| segment.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
