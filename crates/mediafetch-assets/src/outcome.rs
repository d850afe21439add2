//! Completed fetch results.

use crate::bitmap::Bitmap;
use crate::error::FetchResult;
use crate::kind::AssetKind;
use crate::model::SceneGraph;

/// The payload of a successful fetch, one variant per [`AssetKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum AssetResult {
    Text(String),
    Image(Bitmap),
    VideoUrl(String),
    Model(SceneGraph),
}

impl AssetResult {
    /// The kind of this payload.
    pub fn kind(&self) -> AssetKind {
        match self {
            AssetResult::Text(_) => AssetKind::Text,
            AssetResult::Image(_) => AssetKind::Image,
            AssetResult::VideoUrl(_) => AssetKind::VideoUrl,
            AssetResult::Model(_) => AssetKind::Model,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AssetResult::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&Bitmap> {
        match self {
            AssetResult::Image(bitmap) => Some(bitmap),
            _ => None,
        }
    }

    pub fn as_video_url(&self) -> Option<&str> {
        match self {
            AssetResult::VideoUrl(url) => Some(url),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&SceneGraph> {
        match self {
            AssetResult::Model(graph) => Some(graph),
            _ => None,
        }
    }
}

/// Terminal result of one request.
pub type FetchOutcome = FetchResult<AssetResult>;
