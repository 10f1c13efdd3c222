// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `oneagent-init standalone` - strict install, nonzero exit on failure

use anyhow::Result;
use oa_installer::{env, run_standalone, HttpInstallerSource};

use crate::exit_error::{ExitError, INSTALL_FAILED};

pub async fn standalone() -> Result<()> {
    let report = run_standalone(env::var, &HttpInstallerSource::from_env())
        .await
        .map_err(|e| {
            anyhow::Error::new(e)
                .context(ExitError::new(INSTALL_FAILED, "OneAgent installation failed"))
        })?;
    tracing::info!(
        bytes = report.bytes,
        entries = report.entries,
        install_dir = %report.install_dir.display(),
        "installer unpacked"
    );
    Ok(())
}
