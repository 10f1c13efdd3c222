// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use oa_installer::{InstallReport, LabelOutcome, Stage};

async fn exploding_install() -> InitOutcome {
    panic!("zip reader bug")
}

#[tokio::test]
async fn panicking_install_is_contained() {
    assert_eq!(supervise(exploding_install()).await, None);
}

#[tokio::test]
async fn outcome_passes_through() {
    let failed = InitOutcome::Failed {
        stage: Stage::Downloading,
        error: "download error: request failed".to_string(),
        label: LabelOutcome::Labeled,
    };
    let expected = failed.clone();
    assert_eq!(supervise(async move { failed }).await, Some(expected));

    let report = InstallReport { bytes: 2, entries: 1, install_dir: "/opt/dynatrace/oneagent".into() };
    let installed = InitOutcome::Installed(report.clone());
    assert_eq!(supervise(async move { installed }).await, Some(InitOutcome::Installed(report)));
}

#[test]
fn default_args_use_default_label() {
    assert_eq!(InitArgs::default().label(), FailureLabel::default());
}
