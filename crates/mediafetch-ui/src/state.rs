//! Everything the user can see.

use mediafetch_assets::{AssetKind, Bitmap, SceneGraph};

use crate::panels::{Panels, Screen};
use crate::surface::{ImageSurface, ModelAnchor, VideoSurface};

/// Displayed UI state. Only the [`UiDispatcher`](crate::UiDispatcher) and the
/// fetch callbacks it creates mutate this.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub screen: Screen,
    pub selected: Option<AssetKind>,
    pub panels: Panels,
    pub text: String,
    pub image: ImageSurface,
    pub video: VideoSurface,
    pub model_anchor: ModelAnchor,
    /// Message of the last failed load, kept until the next load or reset.
    pub last_error: Option<String>,
}

impl UiState {
    /// Clear every display surface. Panels are left alone.
    pub fn clear_content(&mut self) {
        self.text.clear();
        self.image.clear();
        self.video.stop();
        let destroyed = self.model_anchor.clear();
        if destroyed > 0 {
            tracing::debug!("Destroyed {} model instances", destroyed);
        }
    }

    /// Show exactly one content panel, hiding the rest and the failure panel.
    pub fn show_only(&mut self, kind: AssetKind) {
        self.panels.remove(Panels::CONTENT | Panels::FAILED);
        self.panels.insert(Panels::for_kind(kind));
    }

    pub fn begin_loading(&mut self) {
        self.panels.remove(Panels::FAILED);
        self.panels.insert(Panels::LOADING);
        self.last_error = None;
    }

    /// Hide the loading and failure panels.
    pub fn clear_overlays(&mut self) {
        self.panels.remove(Panels::LOADING | Panels::FAILED);
        self.last_error = None;
    }

    pub fn show_text(&mut self, text: String) {
        self.panels.remove(Panels::LOADING);
        self.text = text;
    }

    pub fn show_image(&mut self, bitmap: Bitmap) {
        self.panels.remove(Panels::LOADING);
        self.image.set(bitmap);
    }

    pub fn show_video(&mut self, url: &str) {
        self.panels.remove(Panels::LOADING);
        self.video.play(url);
    }

    pub fn attach_model(&mut self, model: SceneGraph) {
        self.panels.remove(Panels::LOADING);
        self.model_anchor.attach(model);
    }

    pub fn show_failure(&mut self, message: String) {
        self.panels.remove(Panels::LOADING);
        self.panels.insert(Panels::FAILED);
        self.last_error = Some(message);
    }

    pub fn is_loading(&self) -> bool {
        self.panels.is_loading()
    }

    pub fn is_failed(&self) -> bool {
        self.panels.is_failed()
    }

    /// Whether any surface currently shows content.
    pub fn has_content(&self) -> bool {
        !self.text.is_empty()
            || self.image.bitmap().is_some()
            || self.video.url().is_some()
            || !self.model_anchor.is_empty()
    }
}
