//! Asset kinds and requests.

use std::fmt;
use std::str::FromStr;

/// The four kinds of remote content, in selector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Plain UTF-8 text.
    Text,
    /// An encoded image, decoded into a [`Bitmap`](crate::Bitmap).
    Image,
    /// A video location handed to a player; never downloaded.
    VideoUrl,
    /// A binary glTF model, imported into a [`SceneGraph`](crate::SceneGraph).
    Model,
}

impl AssetKind {
    /// All kinds, indexed by selector position.
    pub const ALL: [AssetKind; 4] = [
        AssetKind::Text,
        AssetKind::Image,
        AssetKind::VideoUrl,
        AssetKind::Model,
    ];

    /// Map a selector index (0..=3) to a kind.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The selector index of this kind.
    pub fn index(self) -> usize {
        match self {
            AssetKind::Text => 0,
            AssetKind::Image => 1,
            AssetKind::VideoUrl => 2,
            AssetKind::Model => 3,
        }
    }

    /// Lowercase name, as used in content manifests.
    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::Text => "text",
            AssetKind::Image => "image",
            AssetKind::VideoUrl => "video",
            AssetKind::Model => "model",
        }
    }

    /// Whether fetching this kind goes over the network.
    pub fn is_downloaded(self) -> bool {
        !matches!(self, AssetKind::VideoUrl)
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known asset kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown content type: {}", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for AssetKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(AssetKind::Text),
            "image" => Ok(AssetKind::Image),
            "video" | "videourl" => Ok(AssetKind::VideoUrl),
            "model" | "glb" | "gltf" => Ok(AssetKind::Model),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}

/// A remote location paired with the kind expected there.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetRequest {
    url: String,
    kind: AssetKind,
}

impl AssetRequest {
    /// Create a request.
    pub fn new(url: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    /// The URL to fetch.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The expected kind.
    pub fn kind(&self) -> AssetKind {
        self.kind
    }
}
