//! Test utilities for mediafetch.
//!
//! # Overview
//!
//! - [`MockTransport`] - Transport that records GETs and can hold responses
//! - [`fixtures`] - Small encoded PNG and GLB files
//! - [`TestServer`] - Localhost HTTP server for exercising the real client
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use mediafetch_assets::{AssetFetcher, FetchConfig};
//! use mediafetch_test_utils::MockTransport;
//!
//! let mock = Arc::new(MockTransport::new());
//! mock.respond("http://h/Text.txt", "hello");
//!
//! let fetcher = AssetFetcher::builder(FetchConfig::default().with_base_url("http://h/"))
//!     .shared_transport(mock.clone())
//!     .build()
//!     .unwrap();
//!
//! fetcher.fetch_text(|text| assert_eq!(text, "hello"), |e| panic!("{e}"));
//! fetcher.tick();
//!
//! assert_eq!(mock.count_calls("http://h/Text.txt"), 1);
//! ```

pub mod fixtures;
pub mod http_server;
pub mod mock_transport;

pub use http_server::{TestServer, TestServerBuilder};
pub use mock_transport::{MockTransport, TransportCall};
