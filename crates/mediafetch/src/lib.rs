//! mediafetch - fetch remote media and show it
//!
//! Downloads four kinds of remote content and hands each to a display
//! surface:
//!
//! - **Text**: UTF-8 string shown in a label
//! - **Image**: decoded bitmap shown at its native size
//! - **Video**: a URL handed to a streaming player
//! - **Model**: a binary glTF imported into a scene graph, turned to face -Z
//!   with its default animation playing
//!
//! # Quick Start
//!
//! ```no_run
//! use mediafetch::prelude::*;
//!
//! mediafetch::core::logging::init();
//!
//! let mut showcase = Showcase::new(FetchConfig::default()).unwrap();
//! let ui = showcase.dispatcher_mut();
//! ui.start();
//! ui.select(AssetKind::Image);
//! ui.load();
//!
//! showcase.run_until_idle(Duration::from_secs(30), Duration::from_millis(16));
//! println!("{:?}", showcase.state().image.size());
//! ```
//!
//! # Architecture
//!
//! - [`assets`] owns the [`AssetFetcher`]: a cloneable handle that runs
//!   requests as cooperative tasks and reports each result through exactly
//!   one callback, unless cancelled.
//! - `ui` maps a selection to a panel and a load action and cancels
//!   everything in flight whenever the selection changes.
//! - `Showcase` creates one of each and drives them once per frame.

#[cfg(feature = "ui")]
pub mod showcase;

// Re-export core types
pub use mediafetch_core as core;
pub use mediafetch_core::math;

pub use mediafetch_assets as assets;
pub use mediafetch_assets::{
    AssetFetcher, AssetKind, AssetRequest, AssetResult, Bitmap, FetchConfig, FetchError,
    FetchOutcome, SceneGraph,
};

#[cfg(feature = "ui")]
pub use mediafetch_ui as ui;
#[cfg(feature = "ui")]
pub use mediafetch_ui::{UiDispatcher, UiState};

#[cfg(feature = "ui")]
pub use showcase::{Showcase, ShowcaseError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::assets::{
        AssetFetcher, AssetKind, AssetRequest, AssetResult, FetchConfig, FetchError,
    };
    #[cfg(feature = "ui")]
    pub use crate::showcase::{Showcase, ShowcaseError};
    #[cfg(feature = "ui")]
    pub use crate::ui::{Panels, Screen, UiDispatcher, UiState};
    pub use std::time::Duration;
}
