//! Logging setup based on `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,mediafetch=debug,mediafetch_assets=debug,mediafetch_ui=debug,reqwest=info,hyper=info";

/// Install a global fmt subscriber.
///
/// Honours `RUST_LOG` when present, otherwise falls back to [`DEFAULT_FILTER`].
/// Calling this twice is harmless; the second call is ignored.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Install a global fmt subscriber with an explicit fallback filter.
pub fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .try_init()
        .is_err()
    {
        tracing::debug!("Logging already initialised, keeping the existing subscriber");
    }
}
