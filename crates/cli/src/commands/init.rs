// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `oneagent-init init` - fail-open install for Kubernetes init containers

use std::future::Future;

use anyhow::Result;
use clap::Args;
use oa_installer::{
    env, run_init_container, FailureLabel, HttpInstallerSource, InitOutcome, KubePodLabeler,
};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Label key set on the pod when installation fails
    #[arg(long, default_value = "observable")]
    pub label_key: String,
    /// Label value set on the pod when installation fails
    #[arg(long, default_value = "false")]
    pub label_value: String,
}

impl Default for InitArgs {
    fn default() -> Self {
        let FailureLabel { key, value } = FailureLabel::default();
        Self { label_key: key, label_value: value }
    }
}

impl InitArgs {
    pub fn label(&self) -> FailureLabel {
        FailureLabel { key: self.label_key.clone(), value: self.label_value.clone() }
    }
}

pub async fn init(args: InitArgs) -> Result<()> {
    let label = args.label();
    let install = async move {
        let source = HttpInstallerSource::from_env();
        run_init_container(env::var, &source, &KubePodLabeler::new(), &label).await
    };
    if let Some(InitOutcome::Failed { stage, label, .. }) = supervise(install).await {
        tracing::warn!(failed_at = %stage, label = ?label, "OneAgent not installed");
    }
    Ok(())
}

/// Run `install` as its own task so a panic inside it is logged instead of
/// taking the process down.
async fn supervise<F>(install: F) -> Option<InitOutcome>
where
    F: Future<Output = InitOutcome> + Send + 'static,
{
    match tokio::spawn(install).await {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            tracing::error!(error = %e, "install task aborted");
            None
        }
    }
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
