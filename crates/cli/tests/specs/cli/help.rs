// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn help_lists_both_variants() {
    cli().args(&["--help"]).passes().stdout_has("init").stdout_has("standalone");
}

#[test]
fn init_help_shows_label_flags() {
    cli().args(&["init", "--help"]).passes().stdout_has("--label-key").stdout_has("--label-value");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}

#[test]
fn unknown_subcommand_is_usage_error() {
    cli().args(&["uninstall"]).exits(2);
}
