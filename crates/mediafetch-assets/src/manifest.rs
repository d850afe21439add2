//! Content manifests: a JSON list of typed remote items.
//!
//! ```json
//! { "contents": [
//!     { "type": "text",  "name": "greeting", "url": "https://host/Text.txt" },
//!     { "type": "image", "name": "logo",     "url": "https://host/Image.png", "position": [0, 1, 0] }
//! ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::kind::{AssetKind, AssetRequest};

/// One entry of a [`ContentManifest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Type name, matched case-insensitively against [`AssetKind`].
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    pub url: String,
    /// Optional placement hint, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec<f32>>,
}

impl ContentItem {
    /// The kind named by `type`, if it is one we know.
    pub fn asset_kind(&self) -> Option<AssetKind> {
        self.kind.parse().ok()
    }

    /// A request for this item, if its kind is known.
    pub fn request(&self) -> Option<AssetRequest> {
        self.asset_kind()
            .map(|kind| AssetRequest::new(self.url.clone(), kind))
    }
}

/// A list of remote items to fetch in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentManifest {
    pub contents: Vec<ContentItem>,
}

impl ContentManifest {
    /// Parse a manifest from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        let manifest: ContentManifest = serde_json::from_slice(bytes)?;
        Ok(manifest)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}
