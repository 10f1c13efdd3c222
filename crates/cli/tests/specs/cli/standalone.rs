// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Strict standalone specs: failures exit nonzero and never touch the pod.

use crate::prelude::*;

#[test]
fn missing_environment_exits_one() {
    cli()
        .args(&["standalone"])
        .exits(1)
        .stderr_has("OneAgent installation failed")
        .stderr_has("DT_API_URL")
        .stderr_lacks("failed to label pod");
}

#[test]
fn installs_from_api() {
    let server = FixtureServer::start(200, installer_zip()).unwrap();
    let scratch = Scratch::new();

    cli()
        .args(&["standalone"])
        .installer_env(&server, &scratch.install_dir())
        .passes()
        .stderr_has("installer unpacked");

    assert!(scratch.install_dir().join("oneagent-paas.sh").is_file());
    assert!(scratch.install_dir().join("agent").is_dir());
}

#[test]
fn http_error_exits_one_without_labeling() {
    let server = FixtureServer::start(500, "internal error").unwrap();
    let scratch = Scratch::new();

    cli()
        .args(&["standalone"])
        .installer_env(&server, &scratch.install_dir())
        .pod_env()
        .exits(1)
        .stderr_has("500")
        .stderr_lacks("label");

    assert!(!scratch.install_dir().exists());
}

#[test]
fn corrupt_archive_exits_one() {
    let server = FixtureServer::start(200, "not a zip").unwrap();
    let scratch = Scratch::new();

    cli()
        .args(&["standalone"])
        .installer_env(&server, &scratch.install_dir())
        .exits(1)
        .stderr_has("extraction error");
}

#[test]
fn truncated_download_exits_one() {
    let server = FixtureServer::truncated(installer_zip()).unwrap();
    let scratch = Scratch::new();

    cli()
        .args(&["standalone"])
        .installer_env(&server, &scratch.install_dir())
        .exits(1)
        .stderr_has("download error");
}

#[test]
fn invalid_log_format_env_is_usage_error() {
    cli().args(&["standalone"]).env("ONEAGENT_INIT_LOG_FORMAT", "yaml").exits(2);
}
