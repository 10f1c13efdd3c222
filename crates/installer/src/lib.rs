// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! oa-installer: fetch and unpack the OneAgent PaaS installer.
//!
//! The pipeline is strictly sequential:
//!
//! ```text
//! config → download (temp archive) → extract → cleanup
//!                     │ any error
//!                     ▼
//!          failure reporter (pod label, Kubernetes only)
//! ```
//!
//! Two entry points share it: [`run_init_container`] never fails and labels
//! the pod on error, [`run_standalone`] propagates errors to the caller.

pub mod archive;
pub mod config;
pub mod env;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod label;
pub mod request;
pub mod workflow;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use archive::TempArchive;
pub use config::{InstallConfig, PodRef};
pub use error::{ConfigError, DownloadError, ExtractionError, InstallError, LabelingError};
pub use extract::extract_archive;
pub use fetch::{HttpInstallerSource, InstallerSource};
pub use label::{report_failure, FailureLabel, KubePodLabeler, LabelOutcome, PodLabeler};
pub use request::{parse_options, InstallerRequest, INSTALLER_PATH};
pub use workflow::{
    install, run_init_container, run_standalone, InitOutcome, InstallReport, Stage,
};

#[cfg(any(test, feature = "test-support"))]
pub use fetch::{FakeInstallerSource, FetchCall};
#[cfg(any(test, feature = "test-support"))]
pub use label::{FakePodLabeler, LabelCall};
