// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod init;
pub mod standalone;

use anyhow::Result;
use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Install from a Kubernetes init container (default). Always exits 0;
    /// failures are reported by labeling the pod.
    Init(init::InitArgs),
    /// Install outside Kubernetes. Exits nonzero on failure.
    Standalone,
}

impl Default for Command {
    fn default() -> Self {
        Command::Init(init::InitArgs::default())
    }
}

impl Command {
    /// Whether errors from this command must still exit 0.
    pub fn fail_open(&self) -> bool {
        matches!(self, Command::Init(_))
    }

    pub async fn run(self) -> Result<()> {
        match self {
            Command::Init(args) => init::init(args).await,
            Command::Standalone => standalone::standalone().await,
        }
    }
}
