//! Fetcher configuration.

use std::path::Path;
use std::time::Duration;

use mediafetch_core::config::{self, ConfigError};
use serde::{Deserialize, Serialize};

use crate::kind::AssetKind;

/// Default remote host for the demo content.
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/anuj-chouhan/Unity-Ar-Assets/main/HostedStuffs/";

/// Where each kind of content lives and how models are post-processed.
///
/// Each location is either relative to `base_url` or an absolute
/// `http(s)://` URL used as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Base URL for relative locations.
    pub base_url: String,
    /// Text location.
    pub text: String,
    /// Image location.
    pub image: String,
    /// Model location (binary glTF).
    pub model: String,
    /// Video location, handed to the player untouched.
    pub video: String,
    /// Turn imported model roots to face -Z.
    pub flip_model_forward: bool,
    /// Start the model's default animation clip when it has one.
    pub autoplay_animation: bool,
    /// Transport timeout in milliseconds. `None` or `0` keeps the transport
    /// default.
    pub timeout_ms: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            text: "Text.txt".to_string(),
            image: "Image.png".to_string(),
            model: "Character.glb".to_string(),
            video: "Video.mp4".to_string(),
            flip_model_forward: true,
            autoplay_animation: true,
            timeout_ms: None,
        }
    }
}

impl FetchConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file. Missing fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        config::load_json(path)
    }

    /// Parse from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        config::from_json_str(text, "<inline>")
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the location for a kind.
    pub fn with_location(mut self, kind: AssetKind, location: impl Into<String>) -> Self {
        let location = location.into();
        match kind {
            AssetKind::Text => self.text = location,
            AssetKind::Image => self.image = location,
            AssetKind::VideoUrl => self.video = location,
            AssetKind::Model => self.model = location,
        }
        self
    }

    /// Enable or disable the model forward flip.
    pub fn with_flip_model_forward(mut self, flip: bool) -> Self {
        self.flip_model_forward = flip;
        self
    }

    /// Enable or disable animation autoplay.
    pub fn with_autoplay_animation(mut self, autoplay: bool) -> Self {
        self.autoplay_animation = autoplay;
        self
    }

    /// Set the transport timeout, rounded up to whole milliseconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let millis = timeout.as_nanos().div_ceil(1_000_000);
        self.timeout_ms = Some(u64::try_from(millis).unwrap_or(u64::MAX));
        self
    }

    /// The configured transport timeout. A zero timeout counts as unset.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms
            .filter(|&millis| millis > 0)
            .map(Duration::from_millis)
    }

    /// The raw location string for a kind.
    pub fn location(&self, kind: AssetKind) -> &str {
        match kind {
            AssetKind::Text => &self.text,
            AssetKind::Image => &self.image,
            AssetKind::VideoUrl => &self.video,
            AssetKind::Model => &self.model,
        }
    }

    /// Resolve the full URL for a kind.
    pub fn url_for(&self, kind: AssetKind) -> String {
        join_url(&self.base_url, self.location(kind))
    }
}

/// Join a base URL and a location with exactly one `/` between them.
///
/// Absolute locations win over the base.
pub fn join_url(base: &str, location: &str) -> String {
    if is_absolute_url(location) || base.is_empty() {
        return location.to_string();
    }

    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        location.trim_start_matches('/')
    )
}

fn is_absolute_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}
