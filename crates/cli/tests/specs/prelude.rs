// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for CLI specs.

use std::path::{Path, PathBuf};
use std::process::Output;

pub use oa_installer::test_support::{FixtureServer, ZipFixture};

/// Variables that must never leak from the developer's shell into a spec.
const SCRUBBED: &[&str] = &[
    "DT_API_URL",
    "DT_PAAS_TOKEN",
    "DT_ONEAGENT_OPTIONS",
    "POD_NAME",
    "POD_NAMESPACE",
    "ONEAGENT_INSTALL_DIR",
    "ONEAGENT_INIT_LOG",
    "ONEAGENT_INIT_LOG_FORMAT",
    "KUBERNETES_SERVICE_HOST",
    "KUBERNETES_SERVICE_PORT",
    "HTTP_PROXY",
    "http_proxy",
    "ALL_PROXY",
    "all_proxy",
];

pub const TOKEN: &str = "tok123";

pub struct Cli {
    cmd: assert_cmd::Command,
}

pub fn cli() -> Cli {
    let mut cmd = assert_cmd::Command::cargo_bin("oneagent-init").unwrap();
    for name in SCRUBBED {
        cmd.env_remove(name);
    }
    Cli { cmd }
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Installer variables pointing at `server`, unpacking into `install_dir`.
    pub fn installer_env(self, server: &FixtureServer, install_dir: &Path) -> Self {
        self.env("DT_API_URL", server.url())
            .env("DT_PAAS_TOKEN", TOKEN)
            .env("DT_ONEAGENT_OPTIONS", "flavor=default&include=python")
            .env("ONEAGENT_INSTALL_DIR", install_dir)
    }

    pub fn pod_env(self) -> Self {
        self.env("POD_NAME", "checkout-7d9f").env("POD_NAMESPACE", "shop")
    }

    fn run(mut self) -> Run {
        Run { output: self.cmd.output().unwrap() }
    }

    /// Run and expect exit code 0.
    pub fn passes(self) -> Run {
        self.run().code(0)
    }

    /// Run and expect exit code `code`.
    pub fn exits(self, code: i32) -> Run {
        self.run().code(code)
    }
}

pub struct Run {
    output: Output,
}

impl Run {
    fn code(self, expected: i32) -> Self {
        assert_eq!(
            self.output.status.code(),
            Some(expected),
            "unexpected exit status\n--- stderr ---\n{}",
            self.stderr()
        );
        self
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).to_string()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).to_string()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout().contains(needle), "stdout missing {needle:?}:\n{}", self.stdout());
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr().contains(needle), "stderr missing {needle:?}:\n{}", self.stderr());
        self
    }

    pub fn stderr_lacks(self, needle: &str) -> Self {
        assert!(!self.stderr().contains(needle), "stderr has {needle:?}:\n{}", self.stderr());
        self
    }
}

/// Scratch directory with an install target inside it.
pub struct Scratch {
    dir: tempfile::TempDir,
}

impl Scratch {
    pub fn new() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    pub fn install_dir(&self) -> PathBuf {
        self.dir.path().join("oneagent")
    }
}

pub fn installer_zip() -> Vec<u8> {
    ZipFixture::new()
        .executable("oneagent-paas.sh", "#!/bin/sh\necho installing\n")
        .dir("agent/")
        .file("agent/conf/ruxitagentproc.conf", "[general]\n")
        .build()
        .unwrap()
}
