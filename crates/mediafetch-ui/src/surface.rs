//! Display surfaces that fetched content is rendered into.

use mediafetch_assets::{Bitmap, SceneGraph};

/// Shows a decoded image at its native size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageSurface {
    bitmap: Option<Bitmap>,
    visible: bool,
    size: (u32, u32),
}

impl ImageSurface {
    /// Show `bitmap` and size the surface to it.
    pub fn set(&mut self, bitmap: Bitmap) {
        self.size = bitmap.dimensions();
        self.bitmap = Some(bitmap);
        self.visible = true;
    }

    /// Drop the image and hide the surface.
    pub fn clear(&mut self) {
        self.bitmap = None;
        self.visible = false;
        self.size = (0, 0);
    }

    pub fn bitmap(&self) -> Option<&Bitmap> {
        self.bitmap.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Width and height in pixels, `(0, 0)` when empty.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

/// Hands a URL to a streaming player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoSurface {
    url: Option<String>,
    playing: bool,
    visible: bool,
}

impl VideoSurface {
    /// Show the surface and start streaming `url`.
    pub fn play(&mut self, url: impl Into<String>) {
        self.url = Some(url.into());
        self.visible = true;
        self.playing = true;
    }

    /// Stop playback and forget the URL.
    pub fn stop(&mut self) {
        self.playing = false;
        self.url = None;
        self.visible = false;
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Fixed parent for instantiated models. Owns everything attached to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelAnchor {
    children: Vec<SceneGraph>,
}

impl ModelAnchor {
    pub fn attach(&mut self, model: SceneGraph) {
        self.children.push(model);
    }

    /// Destroy every attached model. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.children.len();
        self.children.clear();
        count
    }

    pub fn children(&self) -> &[SceneGraph] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
