// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Zip extraction into the install directory.
//!
//! Entry names are resolved with [`zip::read::ZipFile::enclosed_name`]; an
//! absolute name or one that climbs out with `..` fails the whole extraction
//! instead of writing outside the target.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::error::ExtractionError;

/// Extract `archive` into `target` on the blocking pool.
///
/// Returns the number of entries written.
pub async fn extract_archive(archive: &Path, target: &Path) -> Result<usize, ExtractionError> {
    let archive = archive.to_path_buf();
    let target = target.to_path_buf();
    tokio::task::spawn_blocking(move || unpack(&archive, &target))
        .await
        .map_err(|e| ExtractionError::Task(e.to_string()))?
}

/// Synchronous extraction. `target` is created if missing.
pub fn unpack(archive: &Path, target: &Path) -> Result<usize, ExtractionError> {
    create_dir_all(target)?;

    let file = File::open(archive).map_err(io_err(archive))?;
    let mut zip = ZipArchive::new(BufReader::new(file))?;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(ExtractionError::UnsafeEntry(entry.name().to_string()));
        };
        let out = target.join(relative);

        if entry.is_dir() {
            create_dir_all(&out)?;
            continue;
        }

        if let Some(parent) = out.parent() {
            create_dir_all(parent)?;
        }
        let mut dest = File::create(&out).map_err(io_err(&out))?;
        // CRC mismatches surface here as read errors
        io::copy(&mut entry, &mut dest).map_err(io_err(&out))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out, fs::Permissions::from_mode(mode & 0o7777))
                .map_err(io_err(&out))?;
        }
    }

    tracing::debug!(entries = zip.len(), target = %target.display(), "archive unpacked");
    Ok(zip.len())
}

fn create_dir_all(path: &Path) -> Result<(), ExtractionError> {
    fs::create_dir_all(path).map_err(io_err(path))
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> ExtractionError {
    let path: PathBuf = path.to_path_buf();
    move |source| ExtractionError::Io { path, source }
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
