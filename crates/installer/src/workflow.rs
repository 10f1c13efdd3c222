// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Install orchestration and the two process entry points.
//!
//! ```text
//! Start → ConfigLoaded → Downloading → Extracting → CleanedUp → Done
//!   └──────────┴─────────────┴─────────────┴────────────┴──→ Failed
//! ```
//!
//! [`run_init_container`] turns `Failed` into a pod label and still reports
//! `Done`; the init container must never hold back the main container.
//! [`run_standalone`] hands the error back to the caller.

use std::fmt;
use std::path::PathBuf;

use tracing::{error, info};

use crate::archive::TempArchive;
use crate::config::{InstallConfig, PodRef};
use crate::error::InstallError;
use crate::extract::extract_archive;
use crate::fetch::InstallerSource;
use crate::label::{report_failure, FailureLabel, LabelOutcome, PodLabeler};

/// Pipeline position, logged as the `stage` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    ConfigLoaded,
    Downloading,
    Extracting,
    CleanedUp,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Start => "start",
            Stage::ConfigLoaded => "config_loaded",
            Stage::Downloading => "downloading",
            Stage::Extracting => "extracting",
            Stage::CleanedUp => "cleaned_up",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(s)
    }
}

impl InstallError {
    /// Stage that was in progress when this error was raised.
    pub fn stage(&self) -> Stage {
        match self {
            InstallError::Config(_) => Stage::Start,
            InstallError::TempFile(_) | InstallError::Download(_) => Stage::Downloading,
            InstallError::Extraction(_) => Stage::Extracting,
            InstallError::Cleanup(_) => Stage::CleanedUp,
        }
    }
}

/// Summary of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub bytes: u64,
    pub entries: usize,
    pub install_dir: PathBuf,
}

/// Download, extract and clean up.
///
/// The temporary archive is removed on every return path.
pub async fn install<S: InstallerSource + ?Sized>(
    source: &S,
    config: &InstallConfig,
) -> Result<InstallReport, InstallError> {
    info!(
        stage = %Stage::ConfigLoaded,
        install_dir = %config.install_dir.display(),
        "configuration loaded"
    );

    let url = config.request.url()?;
    let shown = config.request.redacted_url()?;
    let archive = TempArchive::create().map_err(InstallError::TempFile)?;

    info!(
        stage = %Stage::Downloading,
        url = %shown,
        archive = %archive.path().display(),
        "downloading installer"
    );
    let bytes = source.download(&url, archive.path()).await?;
    info!(bytes, "download completed");

    info!(stage = %Stage::Extracting, install_dir = %config.install_dir.display(), "extracting installer");
    let entries = extract_archive(archive.path(), &config.install_dir).await?;
    info!(entries, "extraction completed");

    archive.close().map_err(InstallError::Cleanup)?;
    info!(stage = %Stage::CleanedUp, "temporary archive removed");

    Ok(InstallReport { bytes, entries, install_dir: config.install_dir.clone() })
}

async fn load_and_install<S: InstallerSource + ?Sized>(
    lookup: &impl Fn(&str) -> Option<String>,
    source: &S,
) -> Result<InstallReport, InstallError> {
    info!(stage = %Stage::Start, "starting OneAgent installation");
    let config = InstallConfig::from_lookup(lookup)?;
    install(source, &config).await
}

/// How the init container run ended. Both variants map to exit code 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Installed(InstallReport),
    Failed { stage: Stage, error: String, label: LabelOutcome },
}

/// Fail-open entry point for the Kubernetes init container.
///
/// Any install error is logged and reported by labeling the pod named by
/// `POD_NAME`/`POD_NAMESPACE` (looked up only on failure). Never returns an
/// error.
pub async fn run_init_container<S, L>(
    lookup: impl Fn(&str) -> Option<String>,
    source: &S,
    labeler: &L,
    label: &FailureLabel,
) -> InitOutcome
where
    S: InstallerSource + ?Sized,
    L: PodLabeler + ?Sized,
{
    let outcome = match load_and_install(&lookup, source).await {
        Ok(report) => {
            info!(stage = %Stage::Done, "OneAgent installation completed");
            InitOutcome::Installed(report)
        }
        Err(e) => {
            let stage = e.stage();
            error!(stage = %Stage::Failed, failed_at = %stage, error = %e, "installation failed");
            let pod = PodRef::from_lookup(&lookup).ok();
            let label = report_failure(labeler, pod.as_ref(), label).await;
            InitOutcome::Failed { stage, error: e.to_string(), label }
        }
    };
    info!(stage = %Stage::Done, "init container exiting successfully regardless of outcome");
    outcome
}

/// Strict entry point: errors are logged and returned to the caller.
pub async fn run_standalone<S: InstallerSource + ?Sized>(
    lookup: impl Fn(&str) -> Option<String>,
    source: &S,
) -> Result<InstallReport, InstallError> {
    match load_and_install(&lookup, source).await {
        Ok(report) => {
            info!(stage = %Stage::Done, "OneAgent installation completed");
            Ok(report)
        }
        Err(e) => {
            error!(stage = %Stage::Failed, failed_at = %e.stage(), error = %e, "installation failed");
            Err(e)
        }
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
