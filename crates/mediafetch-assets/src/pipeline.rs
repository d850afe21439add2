//! Kind-specific download and decode steps.

use std::sync::Arc;

use futures_lite::future;

use crate::bitmap::{Bitmap, BitmapDecoder};
use crate::error::{DecodeError, FetchError, FetchResult};
use crate::kind::{AssetKind, AssetRequest};
use crate::manifest::ContentManifest;
use crate::model::{ModelImporter, SceneGraph};
use crate::outcome::{AssetResult, FetchOutcome};
use crate::transport::HttpTransport;

/// Model post-processing switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOptions {
    pub flip_forward: bool,
    pub autoplay_animation: bool,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            flip_forward: true,
            autoplay_animation: true,
        }
    }
}

/// The transport plus the decoders, shared by every request.
pub struct Pipeline {
    pub(crate) transport: Arc<dyn HttpTransport>,
    pub(crate) bitmap_decoder: Arc<dyn BitmapDecoder>,
    pub(crate) model_importer: Arc<dyn ModelImporter>,
    pub(crate) model_options: ModelOptions,
}

impl Pipeline {
    /// GET and decode UTF-8 text.
    pub async fn text(&self, url: &str) -> FetchResult<String> {
        let bytes = self.transport.get(url).await?;
        let text = decode_text(bytes).map_err(|e| FetchError::decode(url, AssetKind::Text, e))?;
        tracing::info!("Text downloaded from {} ({} bytes)", url, text.len());
        Ok(text)
    }

    /// GET and decode an image.
    pub async fn image(&self, url: &str) -> FetchResult<Bitmap> {
        let bytes = self.transport.get(url).await?;
        // Decode is a suspension point like the download
        future::yield_now().await;

        let bitmap = self
            .bitmap_decoder
            .decode(&bytes)
            .map_err(|e| FetchError::decode(url, AssetKind::Image, e))?;
        tracing::info!(
            "Image loaded from {} ({}x{})",
            url,
            bitmap.width(),
            bitmap.height()
        );
        Ok(bitmap)
    }

    /// GET, import and post-process a model.
    pub async fn model(&self, url: &str) -> FetchResult<SceneGraph> {
        let bytes = self.transport.get(url).await?;
        future::yield_now().await;

        let mut graph = self
            .model_importer
            .import(&bytes)
            .map_err(|e| FetchError::decode(url, AssetKind::Model, e))?;

        if self.model_options.flip_forward {
            graph.flip_forward();
        }

        if self.model_options.autoplay_animation {
            if graph.play_default_animation() {
                if let Some(clip) = graph.playing() {
                    tracing::debug!("Playing animation '{}' ({:.2}s)", clip.name, clip.duration);
                }
            } else {
                tracing::debug!("No animation found in model from {}", url);
            }
        }

        tracing::info!("Model loaded from {} ({} nodes)", url, graph.node_count());
        Ok(graph)
    }

    /// Run the step matching `request.kind()`.
    pub async fn run(&self, request: &AssetRequest) -> FetchOutcome {
        let url = request.url();
        match request.kind() {
            AssetKind::Text => self.text(url).await.map(AssetResult::Text),
            AssetKind::Image => self.image(url).await.map(AssetResult::Image),
            AssetKind::VideoUrl => Ok(AssetResult::VideoUrl(url.to_string())),
            AssetKind::Model => self.model(url).await.map(AssetResult::Model),
        }
    }

    /// GET and parse a content manifest.
    pub async fn manifest(&self, url: &str) -> FetchResult<ContentManifest> {
        let bytes = self.transport.get(url).await?;
        ContentManifest::from_slice(&bytes).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            kind: AssetKind::Text,
            message: e.to_string(),
        })
    }
}

fn decode_text(bytes: Vec<u8>) -> Result<String, DecodeError> {
    let mut text = String::from_utf8(bytes)?;
    if text.starts_with('\u{feff}') {
        text.drain(..'\u{feff}'.len_utf8());
    }
    Ok(text)
}
