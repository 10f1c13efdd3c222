// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the install pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Missing or invalid environment input.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("invalid API URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// HTTP or network failure while fetching the installer.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("installer API returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("download stream interrupted: {0}")]
    Stream(#[source] reqwest::Error),
    #[error("failed to write archive {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Malformed archive or failure writing its entries.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("invalid archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("archive entry {0:?} escapes the target directory")]
    UnsafeEntry(String),
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("extraction task failed: {0}")]
    Task(String),
}

/// Failure to apply the pod failure label. Never escapes the reporter.
#[derive(Debug, Error)]
pub enum LabelingError {
    #[error("POD_NAME or POD_NAMESPACE environment variables are not set")]
    MissingPodIdentity,
    #[error("failed to load in-cluster config: {0}")]
    ClientConfig(String),
    #[error("failed to create kube client: {0}")]
    Client(#[source] kube::Error),
    #[error("failed to patch pod {namespace}/{pod}: {source}")]
    Patch {
        pod: String,
        namespace: String,
        #[source]
        source: kube::Error,
    },
}

/// Any failure of the install pipeline.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("download error: {0}")]
    Download(#[from] DownloadError),
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("failed to create temporary archive: {0}")]
    TempFile(#[source] std::io::Error),
    #[error("failed to remove temporary archive: {0}")]
    Cleanup(#[source] std::io::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
