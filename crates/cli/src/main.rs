// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! oneagent-init: stage the OneAgent PaaS installer into a shared volume.

mod commands;
mod exit_error;
mod logging;

use std::ffi::OsString;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use crate::commands::Command;
use crate::logging::LogFormat;

#[derive(Debug, Parser)]
#[command(
    name = "oneagent-init",
    version,
    about = "Download and unpack the OneAgent PaaS installer",
    long_about = "Download and unpack the OneAgent PaaS installer.\n\n\
                  Reads DT_API_URL, DT_PAAS_TOKEN and DT_ONEAGENT_OPTIONS from the \
                  environment. Without a subcommand, runs `init`."
)]
struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, env = logging::FORMAT_ENV, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Flags whose value is the following argument.
const VALUE_FLAGS: &[&str] = &["--log-format", "--label-key", "--label-value"];

impl Cli {
    /// `init` with default labels, used when the arguments cannot be parsed.
    fn fail_open_default() -> Self {
        let log_format = std::env::var(logging::FORMAT_ENV)
            .ok()
            .and_then(|v| LogFormat::from_str(v.trim(), true).ok())
            .unwrap_or_default();
        Self { log_format, command: None }
    }
}

/// Parse `args`. A usage error on the `init` path falls back to
/// [`Cli::fail_open_default`] and is returned alongside it for logging.
///
/// Help, version, and usage errors for any other subcommand stay errors.
fn parse_args(args: &[OsString]) -> Result<(Cli, Option<clap::Error>), clap::Error> {
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok((cli, None)),
        Err(e) if !e.use_stderr() || !selects_init(args) => Err(e),
        Err(e) => Ok((Cli::fail_open_default(), Some(e))),
    }
}

/// Whether `args` name no subcommand or the `init` subcommand.
fn selects_init(args: &[OsString]) -> bool {
    let mut rest = args.iter().skip(1).map(|a| a.to_string_lossy());
    while let Some(arg) = rest.next() {
        if VALUE_FLAGS.contains(&arg.as_ref()) {
            rest.next();
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        return arg == "init";
    }
    true
}

fn main() -> ExitCode {
    let args: Vec<OsString> = std::env::args_os().collect();
    let (cli, usage_error) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => e.exit(),
    };
    let _guard = logging::init(cli.log_format);
    if let Some(e) = usage_error {
        tracing::warn!(kind = ?e.kind(), error = %e, "invalid arguments, running init with defaults");
    }

    let command = cli.command.unwrap_or_default();
    let fail_open = command.fail_open();

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(anyhow::Error::from)
        .and_then(|runtime| runtime.block_on(command.run()));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if fail_open => {
            tracing::error!(error = %format!("{e:#}"), "init container exiting successfully despite error");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::from(exit_error::exit_code(&e))
        }
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
