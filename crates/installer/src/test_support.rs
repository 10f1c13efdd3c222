// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test fixtures: in-memory zip archives and a local HTTP server that plays
//! the installer API or the Kubernetes API server.

use std::io::{self, BufRead, BufReader, Cursor, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use parking_lot::Mutex;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

enum Entry {
    File { name: String, bytes: Vec<u8>, mode: Option<u32> },
    Dir(String),
}

/// Builder for zip archives used as fake installer payloads.
#[derive(Default)]
pub struct ZipFixture {
    entries: Vec<Entry>,
}

impl ZipFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.entries.push(Entry::File { name: name.to_string(), bytes: bytes.into(), mode: None });
        self
    }

    /// File entry stored with mode 0755.
    pub fn executable(mut self, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.entries.push(Entry::File {
            name: name.to_string(),
            bytes: bytes.into(),
            mode: Some(0o755),
        });
        self
    }

    pub fn dir(mut self, name: &str) -> Self {
        self.entries.push(Entry::Dir(name.to_string()));
        self
    }

    pub fn build(&self) -> zip::result::ZipResult<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for entry in &self.entries {
            match entry {
                Entry::File { name, bytes, mode } => {
                    let mut options = SimpleFileOptions::default();
                    if let Some(mode) = mode {
                        options = options.unix_permissions(*mode);
                    }
                    zip.start_file(name.as_str(), options)?;
                    zip.write_all(bytes)?;
                }
                Entry::Dir(name) => zip.add_directory(name.as_str(), SimpleFileOptions::default())?,
            }
        }
        Ok(zip.finish()?.into_inner())
    }
}

/// A request seen by [`FixtureServer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Path and query as sent
    pub target: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Clone)]
struct FixtureState {
    status: StatusCode,
    body: Bytes,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Local HTTP server answering every request with the same reply and
/// recording what it was sent.
pub struct FixtureServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FixtureServer {
    pub fn start(status: u16, body: impl Into<Vec<u8>>) -> io::Result<Self> {
        let status = StatusCode::from_u16(status)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let (listener, addr) = bind()?;
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = FixtureState {
            status,
            body: Bytes::from(body.into()),
            requests: Arc::clone(&requests),
        };
        let app = Router::new().fallback(reply).with_state(state);

        listener.set_nonblocking(true)?;
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        std::thread::spawn(move || {
            runtime.block_on(async move {
                let served = match tokio::net::TcpListener::from_std(listener) {
                    Ok(listener) => axum::serve(listener, app).await,
                    Err(e) => Err(e),
                };
                if let Err(e) = served {
                    tracing::debug!(error = %e, "fixture server stopped");
                }
            });
        });
        Ok(Self { addr, requests })
    }

    /// 200 reply whose connection closes before the advertised length.
    ///
    /// Written on a raw socket: a conforming server cannot send a short body.
    pub fn truncated(body: impl Into<Vec<u8>>) -> io::Result<Self> {
        let body = body.into();
        let (listener, addr) = bind()?;
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                if let Err(e) = serve_truncated(&mut stream, &body, &seen) {
                    tracing::debug!(error = %e, "fixture server connection failed");
                }
            }
        });
        Ok(Self { addr, requests })
    }

    /// Base URL to use as `DT_API_URL`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request targets (`path?query`) seen so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.target.clone()).collect()
    }

    /// Full requests seen so far.
    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

fn bind() -> io::Result<(TcpListener, SocketAddr)> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    Ok((listener, addr))
}

async fn reply(
    State(state): State<FixtureState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let target = uri.path_and_query().map_or_else(|| uri.path().to_string(), |pq| pq.to_string());
    state.requests.lock().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        target,
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.to_vec(),
    });
    (state.status, [(header::CONTENT_TYPE, "application/octet-stream")], state.body.clone())
}

fn serve_truncated(
    stream: &mut TcpStream,
    body: &[u8],
    seen: &Mutex<Vec<RecordedRequest>>,
) -> io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 || header == "\r\n" {
            break;
        }
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();
    let path = target.split('?').next().unwrap_or_default().to_string();
    seen.lock().push(RecordedRequest { method, path, target, content_type: None, body: Vec::new() });

    write!(
        stream,
        "HTTP/1.1 200 OK\r\nContent-Type: application/zip\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len() + 1024
    )?;
    stream.write_all(body)?;
    stream.flush()
}

/// Environment lookup backed by a fixed list of pairs.
pub fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: Vec<(String, String)> =
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |name| vars.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone())
}
