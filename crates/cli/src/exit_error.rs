// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom error type that carries a process exit code.
//!
//! Commands attach an `ExitError` as context instead of calling
//! `std::process::exit()` directly, allowing `main()` to pick the exit status.

use std::fmt;

/// Exit status for a failed installation.
pub const INSTALL_FAILED: u8 = 1;

#[derive(Debug)]
pub struct ExitError {
    pub code: u8,
    pub message: String,
}

impl ExitError {
    pub fn new(code: u8, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

/// Exit status for `err`: the attached [`ExitError`] code, else 1.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<ExitError>().map_or(INSTALL_FAILED, |e| e.code)
}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
