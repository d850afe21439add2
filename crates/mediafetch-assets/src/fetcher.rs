//! Asset fetcher - the coordinator for remote asset requests.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use async_executor::{LocalExecutor, Task};
use mediafetch_core::alloc::HashMap;
use mediafetch_core::profiling::profile_function;

use crate::bitmap::{Bitmap, BitmapDecoder, ImageDecoder};
use crate::config::FetchConfig;
use crate::error::{FetchError, FetchResult};
use crate::kind::{AssetKind, AssetRequest};
use crate::manifest::ContentItem;
use crate::model::{GltfImporter, ModelImporter, SceneGraph};
use crate::outcome::{AssetResult, FetchOutcome};
use crate::pipeline::{ModelOptions, Pipeline};
use crate::transport::{HttpClient, HttpTransport};

/// How long [`AssetFetcher::run_until_idle`] sleeps between ticks.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A running request. Dropping `task` aborts it.
struct InFlight {
    /// `None` for manifests.
    kind: Option<AssetKind>,
    url: String,
    task: Task<()>,
}

/// The requests currently running, kept only so they can be cancelled.
#[derive(Default)]
pub struct InFlightSet {
    requests: HashMap<RequestId, InFlight>,
}

impl InFlightSet {
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn contains(&self, id: RequestId) -> bool {
        self.requests.contains_key(&id)
    }

    /// Number of running requests for `kind`.
    pub fn count_kind(&self, kind: AssetKind) -> usize {
        self.requests
            .values()
            .filter(|r| r.kind == Some(kind))
            .count()
    }

    fn insert(&mut self, id: RequestId, request: InFlight) {
        self.requests.insert(id, request);
    }

    fn remove(&mut self, id: RequestId) -> Option<InFlight> {
        self.requests.remove(&id)
    }

    /// Forget requests whose task has run to completion.
    fn reap_finished(&mut self) -> usize {
        let before = self.requests.len();
        self.requests.retain(|_, r| !r.task.is_finished());
        before - self.requests.len()
    }

    fn drain(&mut self) -> Vec<InFlight> {
        self.requests.drain().map(|(_, r)| r).collect()
    }
}

/// Builder for [`AssetFetcher`].
pub struct FetcherBuilder {
    config: FetchConfig,
    transport: Option<Arc<dyn HttpTransport>>,
    bitmap_decoder: Option<Arc<dyn BitmapDecoder>>,
    model_importer: Option<Arc<dyn ModelImporter>>,
}

impl FetcherBuilder {
    /// Start from a configuration.
    pub fn new(config: FetchConfig) -> Self {
        Self {
            config,
            transport: None,
            bitmap_decoder: None,
            model_importer: None,
        }
    }

    /// Use a specific transport instead of the HTTP client.
    pub fn transport(self, transport: impl HttpTransport + 'static) -> Self {
        self.shared_transport(Arc::new(transport))
    }

    /// Use a transport that is also held elsewhere (e.g. a test mock).
    pub fn shared_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a specific bitmap decoder.
    pub fn bitmap_decoder(mut self, decoder: impl BitmapDecoder + 'static) -> Self {
        self.bitmap_decoder = Some(Arc::new(decoder));
        self
    }

    /// Use a specific model importer.
    pub fn model_importer(mut self, importer: impl ModelImporter + 'static) -> Self {
        self.model_importer = Some(Arc::new(importer));
        self
    }

    /// Build the fetcher.
    ///
    /// Fails only when the default HTTP client cannot be created.
    pub fn build(self) -> FetchResult<AssetFetcher> {
        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                HttpClient::with_timeout(self.config.timeout())
                    .map_err(|e| FetchError::transport(self.config.base_url.clone(), e))?,
            ),
        };

        Ok(AssetFetcher::assemble(
            self.config,
            transport,
            self.bitmap_decoder
                .unwrap_or_else(|| Arc::new(ImageDecoder) as Arc<dyn BitmapDecoder>),
            self.model_importer
                .unwrap_or_else(|| Arc::new(GltfImporter::new()) as Arc<dyn ModelImporter>),
        ))
    }
}

struct FetcherInner {
    config: FetchConfig,
    video_url: String,
    pipeline: Rc<Pipeline>,
    executor: LocalExecutor<'static>,
    in_flight: RefCell<InFlightSet>,
    next_id: Cell<u64>,
}

/// Issues remote asset requests and reports each result through exactly one
/// of a success or failure callback.
///
/// Requests run cooperatively on a single-threaded executor owned by the
/// fetcher; nothing happens until [`tick`](Self::tick) is called, and every
/// callback runs inside `tick` on the calling thread. Only the blocking
/// network call itself runs on a worker thread.
///
/// The fetcher is a cheap cloneable handle. Create it once at the top of the
/// application and pass clones to whatever needs it.
///
/// # Example
///
/// ```ignore
/// let fetcher = AssetFetcher::new(FetchConfig::default())?;
///
/// fetcher.fetch_text(
///     |text| println!("{text}"),
///     |error| eprintln!("failed: {error}"),
/// );
///
/// // Each frame
/// fetcher.tick();
///
/// // When the user navigates away
/// fetcher.cancel_all();
/// ```
#[derive(Clone)]
pub struct AssetFetcher {
    inner: Rc<FetcherInner>,
}

impl AssetFetcher {
    /// Create a fetcher using the real HTTP client.
    pub fn new(config: FetchConfig) -> FetchResult<Self> {
        FetcherBuilder::new(config).build()
    }

    /// Start building a fetcher.
    pub fn builder(config: FetchConfig) -> FetcherBuilder {
        FetcherBuilder::new(config)
    }

    /// Create a fetcher over a given transport with the default decoders.
    pub fn with_transport(config: FetchConfig, transport: impl HttpTransport + 'static) -> Self {
        Self::assemble(
            config,
            Arc::new(transport),
            Arc::new(ImageDecoder),
            Arc::new(GltfImporter::new()),
        )
    }

    fn assemble(
        config: FetchConfig,
        transport: Arc<dyn HttpTransport>,
        bitmap_decoder: Arc<dyn BitmapDecoder>,
        model_importer: Arc<dyn ModelImporter>,
    ) -> Self {
        let pipeline = Pipeline {
            transport,
            bitmap_decoder,
            model_importer,
            model_options: ModelOptions {
                flip_forward: config.flip_model_forward,
                autoplay_animation: config.autoplay_animation,
            },
        };

        let video_url = config.url_for(AssetKind::VideoUrl);
        tracing::debug!("AssetFetcher created for {}", config.base_url);

        Self {
            inner: Rc::new(FetcherInner {
                config,
                video_url,
                pipeline: Rc::new(pipeline),
                executor: LocalExecutor::new(),
                in_flight: RefCell::new(InFlightSet::default()),
                next_id: Cell::new(1),
            }),
        }
    }

    /// The configuration this fetcher was built with.
    pub fn config(&self) -> &FetchConfig {
        &self.inner.config
    }

    /// The configured request for a kind.
    pub fn request_for(&self, kind: AssetKind) -> AssetRequest {
        AssetRequest::new(self.inner.config.url_for(kind), kind)
    }

    /// Download the configured text and decode it as UTF-8.
    pub fn fetch_text(
        &self,
        on_success: impl FnOnce(String) + 'static,
        on_failure: impl FnOnce(String) + 'static,
    ) -> RequestId {
        let url = self.inner.config.url_for(AssetKind::Text);
        let pipeline = Rc::clone(&self.inner.pipeline);
        let target = url.clone();
        self.spawn_tracked(
            Some(AssetKind::Text),
            url,
            async move { pipeline.text(&target).await },
            on_success,
            on_failure,
        )
    }

    /// Download the configured image and decode it into a bitmap.
    pub fn fetch_image(
        &self,
        on_success: impl FnOnce(Bitmap) + 'static,
        on_failure: impl FnOnce(String) + 'static,
    ) -> RequestId {
        let url = self.inner.config.url_for(AssetKind::Image);
        let pipeline = Rc::clone(&self.inner.pipeline);
        let target = url.clone();
        self.spawn_tracked(
            Some(AssetKind::Image),
            url,
            async move { pipeline.image(&target).await },
            on_success,
            on_failure,
        )
    }

    /// Download and import the configured model.
    ///
    /// The root is turned to face -Z and the default clip started, unless
    /// disabled in the configuration.
    pub fn fetch_model(
        &self,
        on_success: impl FnOnce(SceneGraph) + 'static,
        on_failure: impl FnOnce(String) + 'static,
    ) -> RequestId {
        let url = self.inner.config.url_for(AssetKind::Model);
        let pipeline = Rc::clone(&self.inner.pipeline);
        let target = url.clone();
        self.spawn_tracked(
            Some(AssetKind::Model),
            url,
            async move { pipeline.model(&target).await },
            on_success,
            on_failure,
        )
    }

    /// The video location for a player to stream. Never downloaded.
    pub fn resolve_video_url(&self) -> &str {
        &self.inner.video_url
    }

    /// Fetch any request, e.g. an absolute URL from a manifest.
    pub fn fetch(
        &self,
        request: AssetRequest,
        on_success: impl FnOnce(AssetResult) + 'static,
        on_failure: impl FnOnce(String) + 'static,
    ) -> RequestId {
        let pipeline = Rc::clone(&self.inner.pipeline);
        let url = request.url().to_string();
        self.spawn_tracked(
            Some(request.kind()),
            url,
            async move { pipeline.run(&request).await },
            on_success,
            on_failure,
        )
    }

    /// Fetch without callbacks.
    ///
    /// The returned future is not tracked: drop it to cancel. It can be
    /// awaited on any executor, including this fetcher's via
    /// [`spawn_local`](Self::spawn_local).
    pub fn fetch_async(&self, request: AssetRequest) -> impl Future<Output = FetchOutcome> + use<> {
        let pipeline = Rc::clone(&self.inner.pipeline);
        async move { pipeline.run(&request).await }
    }

    /// Download a content manifest and fetch its items one after another.
    ///
    /// `on_item` runs once per item with a known type, in manifest order.
    /// Unknown types are skipped with a warning. `on_failure` runs only if the
    /// manifest itself cannot be downloaded or parsed.
    pub fn fetch_manifest(
        &self,
        url: impl Into<String>,
        mut on_item: impl FnMut(&ContentItem, FetchOutcome) + 'static,
        on_failure: impl FnOnce(String) + 'static,
    ) -> RequestId {
        let url = url.into();
        let pipeline = Rc::clone(&self.inner.pipeline);
        let target = url.clone();

        let work = async move {
            let manifest = pipeline.manifest(&target).await?;
            if manifest.is_empty() {
                tracing::warn!("Manifest {} has no contents", target);
            }

            let mut delivered = 0;
            for item in &manifest.contents {
                let Some(request) = item.request() else {
                    tracing::warn!("Unknown content type: {} ({})", item.kind, item.name);
                    continue;
                };

                let outcome = pipeline.run(&request).await;
                if let Err(err) = &outcome {
                    tracing::error!("Failed to load {} '{}': {}", item.kind, item.name, err);
                }
                on_item(item, outcome);
                delivered += 1;
            }
            Ok::<_, FetchError>(delivered)
        };

        self.spawn_tracked(
            None,
            url,
            work,
            |delivered: usize| tracing::debug!("Manifest processed, {} items delivered", delivered),
            on_failure,
        )
    }

    /// Run a future on this fetcher's executor.
    ///
    /// The task is not tracked; keep or detach the returned handle.
    pub fn spawn_local<T: 'static>(&self, future: impl Future<Output = T> + 'static) -> Task<T> {
        self.inner.executor.spawn(future)
    }

    /// Abort every in-flight request. None of their callbacks will run.
    ///
    /// Returns the number of requests aborted.
    pub fn cancel_all(&self) -> usize {
        let aborted = self.inner.in_flight.borrow_mut().drain();
        let count = aborted.len();
        if count > 0 {
            tracing::debug!("Cancelled {} in-flight requests", count);
        }
        // Dropping the tasks outside the borrow
        drop(aborted);
        count
    }

    /// Abort a single request. Returns `false` if it already finished.
    pub fn cancel(&self, id: RequestId) -> bool {
        let removed = self.inner.in_flight.borrow_mut().remove(id);
        match removed {
            Some(request) => {
                tracing::debug!("Cancelled request {} for {}", id, request.url);
                drop(request.task);
                true
            }
            None => false,
        }
    }

    /// Run every task that can make progress, then forget finished ones.
    ///
    /// Returns the number of task polls performed. Callbacks run in here.
    pub fn tick(&self) -> usize {
        profile_function!();

        let mut polls = 0;
        while self.inner.executor.try_tick() {
            polls += 1;
        }

        let reaped = self.inner.in_flight.borrow_mut().reap_finished();
        if reaped > 0 {
            tracing::trace!("Reaped {} finished requests", reaped);
        }
        polls
    }

    /// Tick until nothing is in flight or `timeout` elapses.
    ///
    /// Returns `true` if the fetcher went idle.
    pub fn run_until_idle(&self, timeout: Duration) -> bool {
        let start = Instant::now();
        loop {
            self.tick();
            if self.is_idle() {
                return true;
            }
            if start.elapsed() >= timeout {
                tracing::warn!(
                    "Fetcher still busy after {:?} ({} in flight)",
                    timeout,
                    self.in_flight_count()
                );
                return false;
            }
            thread::sleep(IDLE_POLL_INTERVAL);
        }
    }

    /// Number of requests still running.
    pub fn in_flight_count(&self) -> usize {
        self.inner.in_flight.borrow().len()
    }

    /// Number of requests still running for `kind`.
    pub fn in_flight_for(&self, kind: AssetKind) -> usize {
        self.inner.in_flight.borrow().count_kind(kind)
    }

    /// Whether `id` is still running.
    pub fn is_in_flight(&self, id: RequestId) -> bool {
        self.inner.in_flight.borrow().contains(id)
    }

    /// Whether nothing is in flight.
    pub fn is_idle(&self) -> bool {
        self.inner.in_flight.borrow().is_empty()
    }

    fn next_request_id(&self) -> RequestId {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        RequestId(id)
    }

    fn spawn_tracked<T, Fut>(
        &self,
        kind: Option<AssetKind>,
        url: String,
        work: Fut,
        on_success: impl FnOnce(T) + 'static,
        on_failure: impl FnOnce(String) + 'static,
    ) -> RequestId
    where
        T: 'static,
        Fut: Future<Output = FetchResult<T>> + 'static,
    {
        let id = self.next_request_id();
        tracing::debug!("Request {} started: GET {}", id, url);

        let task = self.inner.executor.spawn(async move {
            match work.await {
                Ok(value) => on_success(value),
                Err(err) => {
                    tracing::error!("Request {} failed: {}", id, err);
                    on_failure(err.to_string());
                }
            }
        });

        self.inner
            .in_flight
            .borrow_mut()
            .insert(id, InFlight { kind, url, task });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;

    const BASE: &str = "http://assets.test/hosted/";

    fn config() -> FetchConfig {
        FetchConfig::default().with_base_url(BASE)
    }

    fn url(path: &str) -> String {
        format!("{}{}", BASE, path)
    }

    type Log = Rc<RefCell<Vec<String>>>;

    fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn record<T: fmt::Debug + 'static>(log: &Log, tag: &'static str) -> impl FnOnce(T) + use<T> {
        let log = Rc::clone(log);
        move |value| log.borrow_mut().push(format!("{tag}:{value:?}"))
    }

    #[test]
    fn test_text_success_delivers_body() {
        let fetcher = AssetFetcher::with_transport(
            config(),
            MemoryTransport::new().with(url("Text.txt"), "hello"),
        );
        let calls = log();

        fetcher.fetch_text(record(&calls, "ok"), record(&calls, "err"));
        assert!(fetcher.run_until_idle(Duration::from_secs(1)));

        assert_eq!(*calls.borrow(), vec!["ok:\"hello\"".to_string()]);
    }

    #[test]
    fn test_text_404_reports_failure() {
        let fetcher = AssetFetcher::with_transport(config(), MemoryTransport::new());
        let failures = Rc::new(RefCell::new(Vec::new()));
        let successes = Rc::new(Cell::new(0));

        let f = Rc::clone(&failures);
        let s = Rc::clone(&successes);
        fetcher.fetch_text(
            move |_| s.set(s.get() + 1),
            move |msg| f.borrow_mut().push(msg),
        );
        fetcher.run_until_idle(Duration::from_secs(1));

        assert_eq!(successes.get(), 0);
        let failures = failures.borrow();
        assert_eq!(failures.len(), 1);
        assert!(!failures[0].is_empty());
        assert!(failures[0].contains("404"));
    }

    #[test]
    fn test_nothing_runs_before_tick() {
        let fetcher = AssetFetcher::with_transport(
            config(),
            MemoryTransport::new().with(url("Text.txt"), "hello"),
        );
        let calls = log();

        let id = fetcher.fetch_text(record(&calls, "ok"), record(&calls, "err"));
        assert!(fetcher.is_in_flight(id));
        assert_eq!(fetcher.in_flight_for(AssetKind::Text), 1);
        assert!(calls.borrow().is_empty());

        fetcher.tick();
        assert!(!fetcher.is_in_flight(id));
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_cancel_all_before_completion_suppresses_callbacks() {
        let fetcher = AssetFetcher::with_transport(
            config(),
            MemoryTransport::new().with(url("Text.txt"), "hello"),
        );
        let calls = log();

        fetcher.fetch_text(record(&calls, "ok"), record(&calls, "err"));
        fetcher.fetch_image(record(&calls, "ok"), record(&calls, "err"));
        assert_eq!(fetcher.cancel_all(), 2);

        assert!(fetcher.run_until_idle(Duration::from_secs(1)));
        fetcher.tick();
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_cancel_single_request() {
        let fetcher = AssetFetcher::with_transport(
            config(),
            MemoryTransport::new()
                .with(url("Text.txt"), "kept")
                .with(url("Image.png"), "x"),
        );
        let calls = log();

        let text = fetcher.fetch_text(record(&calls, "text"), record(&calls, "text-err"));
        let image = fetcher.fetch_image(record(&calls, "image"), record(&calls, "image-err"));
        assert!(fetcher.cancel(image));
        assert!(!fetcher.cancel(image));

        fetcher.run_until_idle(Duration::from_secs(1));
        assert!(!fetcher.cancel(text));
        assert_eq!(*calls.borrow(), vec!["text:\"kept\"".to_string()]);
    }

    #[test]
    fn test_resolve_video_url_is_stable() {
        let fetcher = AssetFetcher::with_transport(config(), MemoryTransport::new());
        let first = fetcher.resolve_video_url().to_string();
        for _ in 0..5 {
            assert_eq!(fetcher.resolve_video_url(), first);
        }
        assert_eq!(first, url("Video.mp4"));
        assert!(fetcher.is_idle());
    }

    #[test]
    fn test_generic_fetch_video_url() {
        let fetcher = AssetFetcher::with_transport(config(), MemoryTransport::new());
        let result = Rc::new(RefCell::new(None));

        let r = Rc::clone(&result);
        fetcher.fetch(
            fetcher.request_for(AssetKind::VideoUrl),
            move |res| *r.borrow_mut() = Some(res),
            |msg| panic!("unexpected failure: {msg}"),
        );
        fetcher.run_until_idle(Duration::from_secs(1));

        let result = result.borrow();
        assert_eq!(
            result.as_ref().and_then(AssetResult::as_video_url),
            Some(url("Video.mp4").as_str())
        );
    }

    #[test]
    fn test_fetch_async_returns_outcome() {
        let fetcher = AssetFetcher::with_transport(
            config(),
            MemoryTransport::new().with(url("Text.txt"), "async"),
        );

        let ok = pollster::block_on(fetcher.fetch_async(fetcher.request_for(AssetKind::Text)));
        assert_eq!(ok.unwrap().as_text(), Some("async"));

        let err = pollster::block_on(fetcher.fetch_async(fetcher.request_for(AssetKind::Image)));
        assert!(err.is_err());
    }

    #[test]
    fn test_callback_can_issue_follow_up_request() {
        let fetcher = AssetFetcher::with_transport(
            config(),
            MemoryTransport::new()
                .with(url("Text.txt"), "first")
                .with("http://other.test/second.txt", "second"),
        );
        let calls = log();

        let chained = fetcher.clone();
        let inner_calls = Rc::clone(&calls);
        fetcher.fetch_text(
            move |text| {
                inner_calls.borrow_mut().push(text);
                let follow_up = Rc::clone(&inner_calls);
                chained.fetch(
                    AssetRequest::new("http://other.test/second.txt", AssetKind::Text),
                    move |res| {
                        follow_up
                            .borrow_mut()
                            .push(res.as_text().unwrap_or_default().to_string())
                    },
                    |_| {},
                );
            },
            |_| {},
        );

        assert!(fetcher.run_until_idle(Duration::from_secs(1)));
        assert_eq!(*calls.borrow(), vec!["first".to_string(), "second".to_string()]);
    }
}
