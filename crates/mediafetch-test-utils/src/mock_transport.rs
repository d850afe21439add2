//! Mock implementation of HttpTransport for testing.
//!
//! This module provides a transport that serves canned responses, records
//! every GET, and can hold responses back until a test releases them.

use mediafetch_assets::transport::status_error;
use mediafetch_assets::{FetchError, FetchResult, HttpTransport, TransportFuture};
use mediafetch_core::alloc::{HashMap, HashSet};
use parking_lot::Mutex;

/// Records a GET for verification in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportCall {
    pub url: String,
}

/// What the mock answers for a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MockResponse {
    Body(Vec<u8>),
    Status(u16),
    Error(String),
}

type Reply = flume::Sender<FetchResult<Vec<u8>>>;

/// Mock transport for testing.
///
/// Unknown URLs answer 404. A URL marked with [`hold`](Self::hold) does not
/// answer until [`release`](Self::release) is called, which is how tests
/// keep a request in flight across ticks.
///
/// Uses `Mutex` so it stays `Send + Sync` like any other transport and can be
/// shared with the fetcher through an `Arc`.
#[derive(Default)]
pub struct MockTransport {
    calls: Mutex<Vec<TransportCall>>,
    responses: Mutex<HashMap<String, MockResponse>>,
    held: Mutex<HashSet<String>>,
    pending: Mutex<Vec<(String, Reply)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `url` with a 200.
    pub fn respond(&self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.responses
            .lock()
            .insert(url.into(), MockResponse::Body(body.into()));
    }

    /// Answer `url` with a non-success status.
    pub fn fail(&self, url: impl Into<String>, status: u16) {
        self.responses
            .lock()
            .insert(url.into(), MockResponse::Status(status));
    }

    /// Fail `url` before any response arrives (e.g. connection refused).
    pub fn fail_transport(&self, url: impl Into<String>, message: impl Into<String>) {
        self.responses
            .lock()
            .insert(url.into(), MockResponse::Error(message.into()));
    }

    /// Hold every GET of `url` until [`release`](Self::release).
    pub fn hold(&self, url: impl Into<String>) {
        self.held.lock().insert(url.into());
    }

    /// Answer every held GET of `url` and stop holding it.
    ///
    /// Returns the number of requests answered. Requests whose fetch was
    /// cancelled are skipped.
    pub fn release(&self, url: &str) -> usize {
        self.held.lock().remove(url);

        let waiting: Vec<Reply> = {
            let mut pending = self.pending.lock();
            let (matching, rest): (Vec<_>, Vec<_>) = pending.drain(..).partition(|(u, _)| u == url);
            *pending = rest;
            matching.into_iter().map(|(_, reply)| reply).collect()
        };

        waiting
            .into_iter()
            .filter(|reply| reply.send(self.resolve(url)).is_ok())
            .count()
    }

    /// Release every held URL.
    pub fn release_all(&self) -> usize {
        let urls: Vec<String> = {
            let mut held = self.held.lock();
            let mut urls: Vec<String> = held.drain().collect();
            urls.extend(self.pending.lock().iter().map(|(u, _)| u.clone()));
            urls.sort();
            urls.dedup();
            urls
        };
        urls.iter().map(|url| self.release(url)).sum()
    }

    /// Number of GETs waiting on a held URL.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    /// Get all recorded calls.
    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().clone()
    }

    /// Count GETs of a specific URL.
    pub fn count_calls(&self, url: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.url == url).count()
    }

    /// Total number of GETs.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Clear all recorded calls.
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn resolve(&self, url: &str) -> FetchResult<Vec<u8>> {
        match self.responses.lock().get(url) {
            Some(MockResponse::Body(body)) => Ok(body.clone()),
            Some(MockResponse::Status(status)) => Err(status_error(url, *status)),
            Some(MockResponse::Error(message)) => Err(FetchError::transport(url, message)),
            None => Err(status_error(url, 404)),
        }
    }
}

impl HttpTransport for MockTransport {
    fn get(&self, url: &str) -> TransportFuture {
        self.calls.lock().push(TransportCall {
            url: url.to_string(),
        });

        if !self.held.lock().contains(url) {
            let result = self.resolve(url);
            return Box::pin(async move { result });
        }

        let (tx, rx) = flume::bounded(1);
        self.pending.lock().push((url.to_string(), tx));
        let url = url.to_string();
        Box::pin(async move {
            match rx.recv_async().await {
                Ok(result) => result,
                Err(_) => Err(FetchError::transport(url, "Mock transport dropped the request")),
            }
        })
    }
}
