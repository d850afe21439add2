//! HTTP transports.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use mediafetch_core::alloc::HashMap;

use crate::error::{FetchError, FetchResult};

/// Future type for a single GET.
pub type TransportFuture = Pin<Box<dyn Future<Output = FetchResult<Vec<u8>>> + Send + 'static>>;

/// Something that can GET a URL and hand back the body.
///
/// Implementations must not block the calling thread; the returned future is
/// polled on the fetcher's executor.
pub trait HttpTransport: Send + Sync {
    /// Fetch the body at `url`. Non-success statuses are errors.
    fn get(&self, url: &str) -> TransportFuture;
}

/// Real HTTP transport backed by a blocking `reqwest` client.
///
/// Each GET runs on its own short-lived worker thread and reports back
/// through a channel, so awaiting it never blocks the owning thread.
pub struct HttpClient {
    client: reqwest::blocking::Client,
    next_worker: AtomicUsize,
}

impl HttpClient {
    /// Create a client with the transport's default timeout.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(None)
    }

    /// Create a client with an explicit timeout.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            next_worker: AtomicUsize::new(0),
        })
    }

    fn get_blocking(client: &reqwest::blocking::Client, url: &str) -> FetchResult<Vec<u8>> {
        let response = client
            .get(url)
            .send()
            .map_err(|e| FetchError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                reason: status.canonical_reason().map(String::from),
            });
        }

        response
            .bytes()
            .map(|bytes| bytes.to_vec())
            .map_err(|e| FetchError::transport(url, e))
    }
}

impl HttpTransport for HttpClient {
    fn get(&self, url: &str) -> TransportFuture {
        let (tx, rx) = flume::bounded(1);
        let client = self.client.clone();
        let url = url.to_string();
        let worker = self.next_worker.fetch_add(1, Ordering::Relaxed);

        let worker_url = url.clone();
        let spawned = thread::Builder::new()
            .name(format!("mediafetch-http-{}", worker))
            .spawn(move || {
                let result = Self::get_blocking(&client, &worker_url);
                // The receiver is gone when the request was cancelled
                let _ = tx.send(result);
            });

        Box::pin(async move {
            if let Err(e) = spawned {
                return Err(FetchError::transport(
                    url,
                    format!("Failed to spawn HTTP worker: {}", e),
                ));
            }

            match rx.recv_async().await {
                Ok(result) => result,
                Err(_) => Err(FetchError::transport(url, "HTTP worker exited without a response")),
            }
        })
    }
}

/// A canned response served by [`MemoryTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryResponse {
    /// 200 with this body.
    Body(Vec<u8>),
    /// A bare status code.
    Status(u16),
}

/// In-memory transport for offline runs and tests.
///
/// Unknown URLs answer 404.
#[derive(Default)]
pub struct MemoryTransport {
    responses: HashMap<String, MemoryResponse>,
}

impl MemoryTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `url`.
    pub fn insert(&mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.responses
            .insert(url.into(), MemoryResponse::Body(body.into()));
    }

    /// Answer `url` with a bare status.
    pub fn insert_status(&mut self, url: impl Into<String>, status: u16) {
        self.responses
            .insert(url.into(), MemoryResponse::Status(status));
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.insert(url, body);
        self
    }

    /// Stop serving `url`.
    pub fn remove(&mut self, url: &str) -> Option<MemoryResponse> {
        self.responses.remove(url)
    }

    /// Check if `url` has a canned response.
    pub fn contains(&self, url: &str) -> bool {
        self.responses.contains_key(url)
    }

    /// Resolve a URL synchronously.
    pub fn respond(&self, url: &str) -> FetchResult<Vec<u8>> {
        match self.responses.get(url) {
            Some(MemoryResponse::Body(body)) => Ok(body.clone()),
            Some(MemoryResponse::Status(status)) => Err(status_error(url, *status)),
            None => Err(status_error(url, 404)),
        }
    }
}

impl HttpTransport for MemoryTransport {
    fn get(&self, url: &str) -> TransportFuture {
        let result = self.respond(url);
        Box::pin(async move { result })
    }
}

/// Build a [`FetchError::Status`] with the canonical reason phrase.
pub fn status_error(url: &str, status: u16) -> FetchError {
    let reason = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map(String::from);

    FetchError::Status {
        url: url.to_string(),
        status,
        reason,
    }
}
