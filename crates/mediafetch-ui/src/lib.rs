//! mediafetch UI - panel visibility and display surfaces
//!
//! A dropdown selects one of four content kinds; a "load" action fetches it
//! and renders the result into the matching surface:
//!
//! - Text into a label
//! - Image into a surface sized to the bitmap
//! - Video URL into a streaming player
//! - Model under a fixed anchor
//!
//! Failures show a fixed "failed to load" panel. See [`UiDispatcher`].

pub mod dispatcher;
pub mod panels;
pub mod state;
pub mod surface;

pub use dispatcher::UiDispatcher;
pub use panels::{Panels, Screen};
pub use state::UiState;
pub use surface::{ImageSurface, ModelAnchor, VideoSurface};
