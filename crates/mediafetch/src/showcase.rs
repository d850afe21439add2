//! Composition root - owns the fetcher and the UI dispatcher.

use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use mediafetch_assets::{AssetFetcher, FetchConfig, FetchError, HttpTransport};
use mediafetch_core::config::ConfigError;
use mediafetch_core::profiling;
use mediafetch_ui::{UiDispatcher, UiState};

/// Errors that can occur while setting up a [`Showcase`].
#[derive(Debug)]
pub enum ShowcaseError {
    /// The configuration file could not be read or parsed.
    Config(ConfigError),
    /// The fetcher could not be created.
    Fetch(FetchError),
}

impl fmt::Display for ShowcaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShowcaseError::Config(e) => write!(f, "Configuration error: {}", e),
            ShowcaseError::Fetch(e) => write!(f, "Failed to create fetcher: {}", e),
        }
    }
}

impl std::error::Error for ShowcaseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShowcaseError::Config(e) => Some(e),
            ShowcaseError::Fetch(e) => Some(e),
        }
    }
}

impl From<ConfigError> for ShowcaseError {
    fn from(e: ConfigError) -> Self {
        ShowcaseError::Config(e)
    }
}

impl From<FetchError> for ShowcaseError {
    fn from(e: FetchError) -> Self {
        ShowcaseError::Fetch(e)
    }
}

/// The whole demo: one fetcher handle, one dispatcher, a frame counter.
///
/// Create it once at startup and drive it with [`run_frame`](Self::run_frame).
///
/// # Example
///
/// ```no_run
/// use mediafetch::{AssetKind, FetchConfig, Showcase};
///
/// let mut showcase = Showcase::new(FetchConfig::default()).unwrap();
/// let ui = showcase.dispatcher_mut();
/// ui.start();
/// ui.select(AssetKind::Text);
/// ui.load();
///
/// loop {
///     showcase.run_frame();
///     if !showcase.state().is_loading() {
///         break;
///     }
/// }
/// ```
pub struct Showcase {
    dispatcher: UiDispatcher,
    frame: u64,
}

impl Showcase {
    /// Build with the real HTTP client.
    pub fn new(config: FetchConfig) -> Result<Self, ShowcaseError> {
        let fetcher = AssetFetcher::new(config)?;
        Ok(Self::from_fetcher(fetcher))
    }

    /// Build from a JSON configuration file.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, ShowcaseError> {
        let config = FetchConfig::from_file(path)?;
        Self::new(config)
    }

    /// Build over a specific transport.
    pub fn with_transport(config: FetchConfig, transport: impl HttpTransport + 'static) -> Self {
        Self::from_fetcher(AssetFetcher::with_transport(config, transport))
    }

    /// Wrap an existing fetcher.
    pub fn from_fetcher(fetcher: AssetFetcher) -> Self {
        tracing::info!(
            "Showcase ready (content from {})",
            fetcher.config().base_url
        );
        Self {
            dispatcher: UiDispatcher::new(fetcher),
            frame: 0,
        }
    }

    /// Advance one frame. Returns the number of task polls performed.
    pub fn run_frame(&mut self) -> usize {
        profiling::new_frame();
        self.frame += 1;
        self.dispatcher.tick()
    }

    /// Run frames until nothing is in flight or `timeout` elapses.
    ///
    /// Returns `true` if everything finished.
    pub fn run_until_idle(&mut self, timeout: Duration, frame_time: Duration) -> bool {
        let start = Instant::now();
        loop {
            self.run_frame();
            if self.fetcher().is_idle() {
                return true;
            }
            if start.elapsed() >= timeout {
                return false;
            }
            std::thread::sleep(frame_time);
        }
    }

    /// Frames run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn fetcher(&self) -> &AssetFetcher {
        self.dispatcher.fetcher()
    }

    pub fn dispatcher(&self) -> &UiDispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut UiDispatcher {
        &mut self.dispatcher
    }

    /// Current UI state.
    pub fn state(&self) -> std::cell::Ref<'_, UiState> {
        self.dispatcher.state()
    }
}
