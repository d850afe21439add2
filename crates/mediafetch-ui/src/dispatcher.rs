//! Maps the selected kind to a visible panel and a load action.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use mediafetch_assets::{AssetFetcher, AssetKind, RequestId};
use mediafetch_core::profiling::profile_function;

use crate::panels::{Panels, Screen};
use crate::state::UiState;

/// What "load" does for the current selection.
///
/// Returns the request it started, or `None` when the result was available
/// immediately.
type LoadAction = Box<dyn Fn() -> Option<RequestId>>;

/// Drives [`UiState`] from user actions and fetch results.
///
/// Every action that changes what is shown first cancels all in-flight
/// fetches, so a response for an old selection can never reach the display.
///
/// # Example
///
/// ```ignore
/// let mut ui = UiDispatcher::new(fetcher);
/// ui.start();
/// ui.select(AssetKind::Image);
/// ui.load();
///
/// // Each frame
/// ui.tick();
/// if ui.state().is_failed() {
///     ui.retry();
/// }
/// ```
pub struct UiDispatcher {
    fetcher: AssetFetcher,
    state: Rc<RefCell<UiState>>,
    load_action: Option<LoadAction>,
}

impl UiDispatcher {
    /// Start on the landing screen with Text selected and nothing loading.
    ///
    /// Requests already running on `fetcher` are left alone.
    pub fn new(fetcher: AssetFetcher) -> Self {
        let mut state = UiState::default();
        state.show_only(AssetKind::Text);
        state.selected = Some(AssetKind::Text);

        let mut dispatcher = Self {
            fetcher,
            state: Rc::new(RefCell::new(state)),
            load_action: None,
        };
        dispatcher.load_action = Some(dispatcher.bind(AssetKind::Text));
        dispatcher
    }

    /// Leave the landing screen. Has no effect once demonstrating.
    pub fn start(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.screen == Screen::Landing {
            tracing::debug!("Entering demonstration");
            state.screen = Screen::Demonstration;
        }
    }

    /// Switch to `kind`: cancel fetches, clear content, show its panel and
    /// rebind "load".
    pub fn select(&mut self, kind: AssetKind) {
        let cancelled = self.fetcher.cancel_all();
        if cancelled > 0 {
            tracing::debug!("Selection changed to {}, cancelled {} requests", kind, cancelled);
        }

        {
            let mut state = self.state.borrow_mut();
            state.clear_content();
            state.panels.remove(Panels::LOADING);
            state.last_error = None;
            state.show_only(kind);
            state.selected = Some(kind);
        }

        self.load_action = Some(self.bind(kind));
    }

    /// Select by dropdown index. Returns `false` and changes nothing if the
    /// index is out of range.
    pub fn select_index(&mut self, index: usize) -> bool {
        match AssetKind::from_index(index) {
            Some(kind) => {
                self.select(kind);
                true
            }
            None => {
                tracing::warn!("Ignoring selection index {} (expected 0..=3)", index);
                false
            }
        }
    }

    /// Run the bound load action. Returns `false` on the landing screen or
    /// if nothing is bound.
    pub fn load(&mut self) -> bool {
        if self.state.borrow().screen == Screen::Landing {
            tracing::warn!("Ignoring load before the demonstration has started");
            return false;
        }
        let Some(action) = &self.load_action else {
            tracing::warn!("Load requested with nothing selected");
            return false;
        };

        self.fetcher.cancel_all();
        self.state.borrow_mut().begin_loading();
        if let Some(id) = action() {
            tracing::debug!("Load started as request {}", id);
        }
        true
    }

    /// Cancel fetches and clear everything displayed. Stays on the current
    /// screen and keeps the selection.
    pub fn reset(&mut self) {
        let cancelled = self.fetcher.cancel_all();
        let mut state = self.state.borrow_mut();
        state.clear_content();
        state.clear_overlays();
        tracing::debug!("Reset ({} requests cancelled)", cancelled);
    }

    /// Reset, then issue the same load again.
    pub fn retry(&mut self) -> bool {
        self.reset();
        self.load()
    }

    /// Drive in-flight fetches. Callbacks update the state in here.
    pub fn tick(&self) -> usize {
        profile_function!();
        self.fetcher.tick()
    }

    /// Current UI state.
    ///
    /// # Panics
    ///
    /// If held across a call to [`tick`](Self::tick).
    pub fn state(&self) -> Ref<'_, UiState> {
        self.state.borrow()
    }

    /// A clone of the UI state.
    pub fn snapshot(&self) -> UiState {
        self.state.borrow().clone()
    }

    pub fn fetcher(&self) -> &AssetFetcher {
        &self.fetcher
    }

    pub fn selected(&self) -> Option<AssetKind> {
        self.state.borrow().selected
    }

    fn bind(&self, kind: AssetKind) -> LoadAction {
        let fetcher = self.fetcher.clone();
        let state = Rc::clone(&self.state);

        match kind {
            AssetKind::Text => Box::new(move || {
                let on_success = Rc::clone(&state);
                let on_failure = Rc::clone(&state);
                Some(fetcher.fetch_text(
                    move |text| on_success.borrow_mut().show_text(text),
                    move |message| fail(&on_failure, AssetKind::Text, message),
                ))
            }),
            AssetKind::Image => Box::new(move || {
                let on_success = Rc::clone(&state);
                let on_failure = Rc::clone(&state);
                Some(fetcher.fetch_image(
                    move |bitmap| on_success.borrow_mut().show_image(bitmap),
                    move |message| fail(&on_failure, AssetKind::Image, message),
                ))
            }),
            AssetKind::VideoUrl => Box::new(move || {
                state.borrow_mut().show_video(fetcher.resolve_video_url());
                None
            }),
            AssetKind::Model => Box::new(move || {
                let on_success = Rc::clone(&state);
                let on_failure = Rc::clone(&state);
                Some(fetcher.fetch_model(
                    move |model| on_success.borrow_mut().attach_model(model),
                    move |message| fail(&on_failure, AssetKind::Model, message),
                ))
            }),
        }
    }
}

fn fail(state: &RefCell<UiState>, kind: AssetKind, message: String) {
    tracing::error!("Failed to load {}: {}", kind, message);
    state.borrow_mut().show_failure(message);
}
