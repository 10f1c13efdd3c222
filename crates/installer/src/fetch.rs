// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Installer download.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Url;
use tokio::io::AsyncWriteExt;

use crate::env;
use crate::error::DownloadError;

/// Bytes of an error response kept for the error message.
pub const ERROR_BODY_LIMIT: usize = 4096;

/// Where the installer archive comes from.
#[async_trait]
pub trait InstallerSource: Send + Sync {
    /// Download `url` into the existing file at `dest`, truncating it.
    ///
    /// Returns the number of bytes written.
    async fn download(&self, url: &Url, dest: &Path) -> Result<u64, DownloadError>;
}

/// Streams the installer from the tenant API over HTTP(S).
///
/// The client is built on first use so that client construction failures
/// flow through the same error path as the request itself.
#[derive(Debug, Clone)]
pub struct HttpInstallerSource {
    connect_timeout: Duration,
    timeout: Duration,
}

impl HttpInstallerSource {
    pub fn new(connect_timeout: Duration, timeout: Duration) -> Self {
        Self { connect_timeout, timeout }
    }

    /// Timeouts from `ONEAGENT_CONNECT_TIMEOUT_MS` / `ONEAGENT_DOWNLOAD_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        Self::new(env::connect_timeout(env::var), env::download_timeout(env::var))
    }

    fn client(&self) -> Result<reqwest::Client, DownloadError> {
        reqwest::Client::builder()
            .user_agent(concat!("oneagent-init/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .build()
            .map_err(DownloadError::Client)
    }
}

#[async_trait]
impl InstallerSource for HttpInstallerSource {
    async fn download(&self, url: &Url, dest: &Path) -> Result<u64, DownloadError> {
        let response =
            self.client()?.get(url.clone()).send().await.map_err(DownloadError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(DownloadError::Status { status: status.as_u16(), body });
        }

        let write_err = |source| DownloadError::Write { path: dest.to_path_buf(), source };
        let mut file = tokio::fs::File::create(dest).await.map_err(write_err)?;

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(DownloadError::Stream)?;
            file.write_all(&chunk).await.map_err(write_err)?;
            written += chunk.len() as u64;
        }

        file.flush().await.map_err(write_err)?;
        file.sync_all().await.map_err(write_err)?;
        Ok(written)
    }
}

/// Leading [`ERROR_BODY_LIMIT`] bytes of the body, lossily decoded. A read
/// error ends the body early.
async fn error_body(response: reqwest::Response) -> String {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(Ok(chunk)) = stream.next().await {
        let room = ERROR_BODY_LIMIT - body.len();
        body.extend_from_slice(&chunk[..chunk.len().min(room)]);
        if body.len() == ERROR_BODY_LIMIT {
            break;
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{InstallerSource, Url};
    use crate::error::DownloadError;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    /// Recorded download
    #[derive(Debug, Clone)]
    pub struct FetchCall {
        pub url: Url,
        pub dest: PathBuf,
    }

    enum Reply {
        Body(Vec<u8>),
        Status(u16, String),
    }

    struct FakeSourceState {
        reply: Reply,
        calls: Vec<FetchCall>,
    }

    /// Fake installer source for testing
    #[derive(Clone)]
    pub struct FakeInstallerSource {
        inner: Arc<Mutex<FakeSourceState>>,
    }

    impl FakeInstallerSource {
        /// Answer every download with `body`.
        pub fn serving(body: impl Into<Vec<u8>>) -> Self {
            Self::with_reply(Reply::Body(body.into()))
        }

        /// Answer every download with a non-2xx status.
        pub fn failing(status: u16, body: impl Into<String>) -> Self {
            Self::with_reply(Reply::Status(status, body.into()))
        }

        fn with_reply(reply: Reply) -> Self {
            Self { inner: Arc::new(Mutex::new(FakeSourceState { reply, calls: Vec::new() })) }
        }

        /// Get all recorded downloads
        pub fn calls(&self) -> Vec<FetchCall> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl InstallerSource for FakeInstallerSource {
        async fn download(&self, url: &Url, dest: &Path) -> Result<u64, DownloadError> {
            let body = {
                let mut inner = self.inner.lock();
                inner.calls.push(FetchCall { url: url.clone(), dest: dest.to_path_buf() });
                match &inner.reply {
                    Reply::Body(body) => body.clone(),
                    Reply::Status(status, body) => {
                        return Err(DownloadError::Status { status: *status, body: body.clone() })
                    }
                }
            };
            tokio::fs::write(dest, &body)
                .await
                .map_err(|source| DownloadError::Write { path: dest.to_path_buf(), source })?;
            Ok(body.len() as u64)
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeInstallerSource, FetchCall};

#[cfg(test)]
#[path = "fetch_tests.rs"]
mod tests;
