// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fail-open init container specs: exit code is always 0.

use crate::prelude::*;

#[test]
fn missing_environment_exits_zero() {
    cli()
        .passes()
        .stderr_has("missing required environment variables")
        .stderr_has("failed to label pod");
}

#[test]
fn missing_environment_makes_no_request() {
    let server = FixtureServer::start(200, installer_zip()).unwrap();
    let scratch = Scratch::new();

    cli()
        .installer_env(&server, &scratch.install_dir())
        .env("DT_PAAS_TOKEN", "")
        .pod_env()
        .passes()
        .stderr_has("DT_PAAS_TOKEN");

    assert!(server.requests().is_empty());
    assert!(!scratch.install_dir().exists());
}

#[test]
fn installs_from_api() {
    let server = FixtureServer::start(200, installer_zip()).unwrap();
    let scratch = Scratch::new();

    cli()
        .installer_env(&server, &scratch.install_dir())
        .pod_env()
        .passes()
        .stderr_has("OneAgent installation completed")
        .stderr_lacks(TOKEN);

    assert_eq!(
        server.requests(),
        vec![format!(
            "{}?Api-Token={}&flavor=default&include=python",
            oa_installer::INSTALLER_PATH,
            TOKEN
        )]
    );
    let install_dir = scratch.install_dir();
    assert!(install_dir.join("oneagent-paas.sh").is_file());
    assert_eq!(
        std::fs::read_to_string(install_dir.join("agent/conf/ruxitagentproc.conf")).unwrap(),
        "[general]\n"
    );
}

#[test]
fn explicit_init_subcommand_behaves_like_default() {
    let server = FixtureServer::start(200, installer_zip()).unwrap();
    let scratch = Scratch::new();

    cli().args(&["init"]).installer_env(&server, &scratch.install_dir()).passes();

    assert!(scratch.install_dir().join("oneagent-paas.sh").is_file());
}

#[test]
fn http_error_exits_zero_and_attempts_label() {
    let server = FixtureServer::start(401, "Token Authentication failed").unwrap();
    let scratch = Scratch::new();

    cli()
        .installer_env(&server, &scratch.install_dir())
        .pod_env()
        .passes()
        .stderr_has("401")
        // No cluster here, so the label attempt itself fails and is swallowed
        .stderr_has("failed to label pod")
        .stderr_has("in-cluster");

    assert_eq!(server.requests().len(), 1);
    assert!(!scratch.install_dir().exists());
}

#[test]
fn corrupt_archive_exits_zero() {
    let server = FixtureServer::start(200, "<html>maintenance</html>").unwrap();
    let scratch = Scratch::new();

    cli()
        .installer_env(&server, &scratch.install_dir())
        .pod_env()
        .passes()
        .stderr_has("extraction error");
}

#[test]
fn unreachable_api_exits_zero() {
    let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();

    cli()
        .env("DT_API_URL", format!("http://127.0.0.1:{port}"))
        .env("DT_PAAS_TOKEN", TOKEN)
        .env("DT_ONEAGENT_OPTIONS", "flavor=default")
        .env("ONEAGENT_INSTALL_DIR", Scratch::new().install_dir())
        .passes()
        .stderr_has("download error");
}

#[test]
fn json_logs() {
    cli().args(&["--log-format", "json"]).passes().stderr_has("\"level\":\"ERROR\"");
}

#[test]
fn invalid_log_format_env_still_installs() {
    let server = FixtureServer::start(200, installer_zip()).unwrap();
    let scratch = Scratch::new();

    cli()
        .installer_env(&server, &scratch.install_dir())
        .env("ONEAGENT_INIT_LOG_FORMAT", "yaml")
        .pod_env()
        .passes()
        .stderr_has("invalid arguments, running init with defaults")
        .stderr_has("OneAgent installation completed");

    assert_eq!(server.requests().len(), 1);
    assert!(scratch.install_dir().join("oneagent-paas.sh").is_file());
}

#[test]
fn uppercase_log_format_env_is_accepted() {
    let server = FixtureServer::start(200, installer_zip()).unwrap();
    let scratch = Scratch::new();

    cli()
        .installer_env(&server, &scratch.install_dir())
        .env("ONEAGENT_INIT_LOG_FORMAT", "JSON")
        .passes()
        .stderr_has("\"level\":\"INFO\"");

    assert!(scratch.install_dir().join("oneagent-paas.sh").is_file());
}

#[test]
fn unknown_init_flag_still_installs() {
    let server = FixtureServer::start(200, installer_zip()).unwrap();
    let scratch = Scratch::new();

    cli().args(&["init", "--no-such-flag"]).installer_env(&server, &scratch.install_dir()).passes();

    assert!(scratch.install_dir().join("oneagent-paas.sh").is_file());
}
