// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scoped temporary file holding the downloaded installer archive.

use std::io;
use std::path::Path;

use tempfile::TempPath;

const PREFIX: &str = "oneagent-";
const SUFFIX: &str = ".zip";

/// Uniquely named temporary archive, removed when dropped.
///
/// [`close`](Self::close) removes it explicitly and reports the error; every
/// other exit path (early `?`, panic unwinding) falls back to drop.
#[derive(Debug)]
pub struct TempArchive {
    path: TempPath,
}

impl TempArchive {
    /// Create an empty archive file in the system temp directory.
    pub fn create() -> io::Result<Self> {
        Self::create_in(std::env::temp_dir())
    }

    pub fn create_in(dir: impl AsRef<Path>) -> io::Result<Self> {
        let file = tempfile::Builder::new().prefix(PREFIX).suffix(SUFFIX).tempfile_in(dir)?;
        Ok(Self { path: file.into_temp_path() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now.
    pub fn close(self) -> io::Result<()> {
        self.path.close()
    }
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
