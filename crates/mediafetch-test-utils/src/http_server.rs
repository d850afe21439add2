//! A tiny HTTP/1.1 server on localhost for exercising the real client.

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use mediafetch_core::alloc::HashMap;

/// A canned route.
#[derive(Debug, Clone)]
struct Route {
    status: u16,
    body: Vec<u8>,
}

/// Serves a fixed set of paths on `127.0.0.1`. Unknown paths answer 404.
///
/// The server thread answers exactly `requests` connections and then exits.
pub struct TestServer {
    addr: SocketAddr,
    handle: Option<JoinHandle<()>>,
}

/// Routes for a [`TestServer`].
#[derive(Debug, Default, Clone)]
pub struct TestServerBuilder {
    routes: HashMap<String, Route>,
}

impl TestServerBuilder {
    /// Answer `path` with 200 and `body`.
    pub fn route(mut self, path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(
            path.into(),
            Route {
                status: 200,
                body: body.into(),
            },
        );
        self
    }

    /// Answer `path` with an empty body and `status`.
    pub fn status(mut self, path: impl Into<String>, status: u16) -> Self {
        self.routes.insert(
            path.into(),
            Route {
                status,
                body: Vec::new(),
            },
        );
        self
    }

    /// Bind to an ephemeral port and serve `requests` connections.
    pub fn serve(self, requests: usize) -> std::io::Result<TestServer> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        let routes = self.routes;

        let handle = thread::Builder::new()
            .name("test-http-server".to_string())
            .spawn(move || {
                for stream in listener.incoming().take(requests).flatten() {
                    let _ = handle_connection(stream, &routes);
                }
            })?;

        Ok(TestServer {
            addr,
            handle: Some(handle),
        })
    }
}

impl TestServer {
    pub fn builder() -> TestServerBuilder {
        TestServerBuilder::default()
    }

    /// `http://127.0.0.1:<port>/`
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Full URL for `path` (without a leading slash).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path.trim_start_matches('/'))
    }

    /// Wait for the server thread to answer all its connections.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn handle_connection(stream: TcpStream, routes: &HashMap<String, Route>) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .trim_start_matches('/')
        .to_string();

    // Drain headers
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 || line == "\r\n" {
            break;
        }
    }

    let (status, body) = match routes.get(&path) {
        Some(route) => (route.status, route.body.as_slice()),
        None => (404, &b""[..]),
    };

    let mut stream = stream;
    write!(
        stream,
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason(status),
        body.len()
    )?;
    stream.write_all(body)?;
    stream.flush()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
