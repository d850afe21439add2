//! Remote asset fetching for mediafetch.
//!
//! Downloads four kinds of content from a configurable host and decodes each
//! into something the UI can show:
//!
//! - **Text**: UTF-8 string
//! - **Image**: RGBA8 [`Bitmap`]
//! - **Video**: a URL for a streaming player, never downloaded
//! - **Model**: binary glTF imported into a [`SceneGraph`]
//!
//! # Example
//!
//! ```ignore
//! use mediafetch_assets::{AssetFetcher, FetchConfig};
//!
//! let fetcher = AssetFetcher::new(FetchConfig::default())?;
//! fetcher.fetch_image(
//!     |bitmap| println!("{}x{}", bitmap.width(), bitmap.height()),
//!     |error| eprintln!("{error}"),
//! );
//!
//! while !fetcher.is_idle() {
//!     fetcher.tick();
//! }
//! ```
//!
//! # Threading
//!
//! An [`AssetFetcher`] is single-threaded: requests are cooperative tasks on
//! an executor owned by the fetcher and progress only inside
//! [`AssetFetcher::tick`]. Network I/O is the only work done off-thread, by
//! [`HttpClient`]. Custom transports and decoders must be `Send + Sync`.

pub mod bitmap;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod kind;
pub mod manifest;
pub mod model;
pub mod outcome;
pub mod pipeline;
pub mod transport;

pub use bitmap::{Bitmap, BitmapDecoder, ImageDecoder};
pub use config::{DEFAULT_BASE_URL, FetchConfig, join_url};
pub use error::{DecodeError, FetchError, FetchResult};
pub use fetcher::{AssetFetcher, FetcherBuilder, InFlightSet, RequestId};
pub use kind::{AssetKind, AssetRequest, UnknownKind};
pub use manifest::{ContentItem, ContentManifest};
pub use model::{AnimationClip, GltfImporter, MeshInfo, ModelImporter, SceneGraph, SceneNode, Transform};
pub use outcome::{AssetResult, FetchOutcome};
pub use pipeline::ModelOptions;
pub use transport::{HttpClient, HttpTransport, MemoryResponse, MemoryTransport, TransportFuture};
