//! Integration tests for the fetch pipeline.
//!
//! These tests drive a real fetcher over a mock transport, and the HTTP
//! client against a localhost server.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use mediafetch_assets::*;
use mediafetch_core::math::Vec3;
use mediafetch_test_utils::{MockTransport, TestServer, fixtures};

const BASE: &str = "http://assets.test/HostedStuffs/";
const TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// Helpers
// ============================================================================

fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

fn setup() -> (AssetFetcher, Arc<MockTransport>) {
    let mock = Arc::new(MockTransport::new());
    let fetcher = AssetFetcher::builder(FetchConfig::default().with_base_url(BASE))
        .shared_transport(mock.clone())
        .build()
        .unwrap();
    (fetcher, mock)
}

/// Counts callbacks and keeps the last value/message.
struct Recorder<T> {
    successes: Cell<usize>,
    failures: Cell<usize>,
    value: RefCell<Option<T>>,
    message: RefCell<Option<String>>,
}

impl<T: 'static> Recorder<T> {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            successes: Cell::new(0),
            failures: Cell::new(0),
            value: RefCell::new(None),
            message: RefCell::new(None),
        })
    }

    fn on_success(self: &Rc<Self>) -> impl FnOnce(T) + use<T> {
        let recorder = Rc::clone(self);
        move |value| {
            recorder.successes.set(recorder.successes.get() + 1);
            *recorder.value.borrow_mut() = Some(value);
        }
    }

    fn on_failure(self: &Rc<Self>) -> impl FnOnce(String) + use<T> {
        let recorder = Rc::clone(self);
        move |message| {
            recorder.failures.set(recorder.failures.get() + 1);
            *recorder.message.borrow_mut() = Some(message);
        }
    }

    fn total(&self) -> usize {
        self.successes.get() + self.failures.get()
    }
}

// ============================================================================
// Per-kind fetches
// ============================================================================

#[test]
fn test_fetch_text() {
    let (fetcher, mock) = setup();
    mock.respond(url("Text.txt"), "Welcome to the demo");
    let recorder = Recorder::<String>::new();

    fetcher.fetch_text(recorder.on_success(), recorder.on_failure());
    assert!(fetcher.run_until_idle(TIMEOUT));

    assert_eq!(recorder.successes.get(), 1);
    assert_eq!(recorder.failures.get(), 0);
    assert_eq!(recorder.value.borrow().as_deref(), Some("Welcome to the demo"));
    assert_eq!(mock.count_calls(&url("Text.txt")), 1);
}

#[test]
fn test_fetch_text_not_found() {
    let (fetcher, _mock) = setup();
    let recorder = Recorder::<String>::new();

    fetcher.fetch_text(recorder.on_success(), recorder.on_failure());
    fetcher.run_until_idle(TIMEOUT);

    assert_eq!(recorder.successes.get(), 0);
    assert_eq!(recorder.failures.get(), 1);
    let message = recorder.message.borrow().clone().unwrap();
    assert!(message.contains("404"), "{message}");
}

#[test]
fn test_fetch_text_connection_failure() {
    let (fetcher, mock) = setup();
    mock.fail_transport(url("Text.txt"), "Connection refused");
    let recorder = Recorder::<String>::new();

    fetcher.fetch_text(recorder.on_success(), recorder.on_failure());
    fetcher.run_until_idle(TIMEOUT);

    assert_eq!(recorder.failures.get(), 1);
    assert!(recorder.message.borrow().as_deref().unwrap().contains("Connection refused"));
}

#[test]
fn test_fetch_image() {
    let (fetcher, mock) = setup();
    mock.respond(url("Image.png"), fixtures::png_bytes(64, 32).unwrap());
    let recorder = Recorder::<Bitmap>::new();

    fetcher.fetch_image(recorder.on_success(), recorder.on_failure());
    fetcher.run_until_idle(TIMEOUT);

    let bitmap = recorder.value.borrow().clone().unwrap();
    assert_eq!(bitmap.dimensions(), (64, 32));
    assert_eq!(bitmap.pixel(0, 0), Some(fixtures::PNG_ORIGIN_COLOR));
    assert_eq!(bitmap.pixel(1, 0), Some([255, 255, 255, 255]));
}

#[test]
fn test_fetch_image_undecodable_body() {
    let (fetcher, mock) = setup();
    mock.respond(url("Image.png"), "<html>not an image</html>");
    let recorder = Recorder::<Bitmap>::new();

    fetcher.fetch_image(recorder.on_success(), recorder.on_failure());
    fetcher.run_until_idle(TIMEOUT);

    assert_eq!(recorder.successes.get(), 0);
    assert_eq!(recorder.failures.get(), 1);
    assert!(!recorder.message.borrow().as_deref().unwrap().is_empty());
}

#[test]
fn test_fetch_model_with_animation() {
    let (fetcher, mock) = setup();
    mock.respond(url("Character.glb"), fixtures::glb(true));
    let recorder = Recorder::<SceneGraph>::new();

    fetcher.fetch_model(recorder.on_success(), recorder.on_failure());
    fetcher.run_until_idle(TIMEOUT);

    let graph = recorder.value.borrow().clone().unwrap();
    assert!((graph.root.transform.forward() - Vec3::NEG_Z).length() < 1e-5);
    assert!(graph.root.find("Head").is_some());

    let playing = graph.playing().unwrap();
    assert_eq!(playing.name, fixtures::ANIMATION_NAME);
    assert!((playing.duration - fixtures::ANIMATION_DURATION).abs() < 1e-5);
}

#[test]
fn test_fetch_model_without_animation() {
    let (fetcher, mock) = setup();
    mock.respond(url("Character.glb"), fixtures::glb(false));
    let recorder = Recorder::<SceneGraph>::new();

    fetcher.fetch_model(recorder.on_success(), recorder.on_failure());
    fetcher.run_until_idle(TIMEOUT);

    let graph = recorder.value.borrow().clone().unwrap();
    assert_eq!(recorder.failures.get(), 0);
    assert!(graph.playing().is_none());
    assert!((graph.root.transform.forward() - Vec3::NEG_Z).length() < 1e-5);
}

#[test]
fn test_fetch_model_post_processing_disabled_in_config() {
    let mock = Arc::new(MockTransport::new());
    let config = FetchConfig::default()
        .with_base_url(BASE)
        .with_autoplay_animation(false)
        .with_flip_model_forward(false);
    let fetcher = AssetFetcher::builder(config)
        .shared_transport(mock.clone())
        .build()
        .unwrap();
    mock.respond(url("Character.glb"), fixtures::glb(true));
    let recorder = Recorder::<SceneGraph>::new();

    fetcher.fetch_model(recorder.on_success(), recorder.on_failure());
    fetcher.run_until_idle(TIMEOUT);

    let graph = recorder.value.borrow().clone().unwrap();
    assert!(graph.playing().is_none());
    assert!(graph.default_animation().is_some());
    assert!((graph.root.transform.forward() - Vec3::Z).length() < 1e-5);
}

#[test]
fn test_fetch_model_truncated() {
    let (fetcher, mock) = setup();
    let mut glb = fixtures::glb(true);
    glb.truncate(glb.len() / 2);
    mock.respond(url("Character.glb"), glb);
    let recorder = Recorder::<SceneGraph>::new();

    fetcher.fetch_model(recorder.on_success(), recorder.on_failure());
    fetcher.run_until_idle(TIMEOUT);

    assert_eq!(recorder.successes.get(), 0);
    assert_eq!(recorder.failures.get(), 1);
}

#[test]
fn test_video_url_needs_no_network() {
    let (fetcher, mock) = setup();

    assert_eq!(fetcher.resolve_video_url(), url("Video.mp4"));
    assert_eq!(fetcher.resolve_video_url(), fetcher.resolve_video_url());
    assert_eq!(mock.call_count(), 0);
}

// ============================================================================
// Cancellation and delivery
// ============================================================================

#[test]
fn test_cancel_all_while_held() {
    let (fetcher, mock) = setup();
    mock.respond(url("Text.txt"), "late");
    mock.hold(url("Text.txt"));
    let recorder = Recorder::<String>::new();

    fetcher.fetch_text(recorder.on_success(), recorder.on_failure());
    fetcher.tick();
    assert_eq!(fetcher.in_flight_count(), 1);
    assert_eq!(mock.pending_count(), 1);

    assert_eq!(fetcher.cancel_all(), 1);
    assert!(fetcher.is_idle());

    // The executor drops the aborted future on its next tick
    fetcher.tick();
    assert_eq!(mock.release(&url("Text.txt")), 0);
    for _ in 0..10 {
        fetcher.tick();
    }
    assert_eq!(recorder.total(), 0);
}

#[test]
fn test_cancel_all_twice_is_noop() {
    let (fetcher, _mock) = setup();
    assert_eq!(fetcher.cancel_all(), 0);
    assert_eq!(fetcher.cancel_all(), 0);
}

#[test]
fn test_held_request_completes_after_release() {
    let (fetcher, mock) = setup();
    mock.respond(url("Text.txt"), "eventually");
    mock.hold(url("Text.txt"));
    let recorder = Recorder::<String>::new();

    fetcher.fetch_text(recorder.on_success(), recorder.on_failure());
    for _ in 0..5 {
        fetcher.tick();
    }
    assert_eq!(recorder.total(), 0);

    assert_eq!(mock.release(&url("Text.txt")), 1);
    assert!(fetcher.run_until_idle(TIMEOUT));
    assert_eq!(recorder.value.borrow().as_deref(), Some("eventually"));
}

#[test]
fn test_overlapping_requests_each_complete_once() {
    let (fetcher, mock) = setup();
    mock.respond(url("Text.txt"), "t");
    mock.respond(url("Image.png"), fixtures::png_bytes(2, 2).unwrap());
    mock.respond(url("Character.glb"), fixtures::glb(false));

    let text = Recorder::<String>::new();
    let image = Recorder::<Bitmap>::new();
    let model = Recorder::<SceneGraph>::new();
    fetcher.fetch_text(text.on_success(), text.on_failure());
    fetcher.fetch_image(image.on_success(), image.on_failure());
    fetcher.fetch_model(model.on_success(), model.on_failure());
    assert_eq!(fetcher.in_flight_count(), 3);

    assert!(fetcher.run_until_idle(TIMEOUT));
    assert_eq!(text.successes.get(), 1);
    assert_eq!(image.successes.get(), 1);
    assert_eq!(model.successes.get(), 1);
}

#[test]
fn test_cancel_one_leaves_others() {
    let (fetcher, mock) = setup();
    mock.respond(url("Text.txt"), "t");
    mock.hold(url("Image.png"));

    let text = Recorder::<String>::new();
    let image = Recorder::<Bitmap>::new();
    fetcher.fetch_text(text.on_success(), text.on_failure());
    let image_id = fetcher.fetch_image(image.on_success(), image.on_failure());

    fetcher.tick();
    assert_eq!(text.successes.get(), 1);
    assert!(fetcher.is_in_flight(image_id));

    assert!(fetcher.cancel(image_id));
    mock.release_all();
    fetcher.run_until_idle(TIMEOUT);
    assert_eq!(image.total(), 0);
}

// ============================================================================
// Manifests
// ============================================================================

#[test]
fn test_manifest_fetches_known_items_in_order() {
    let (fetcher, mock) = setup();
    let manifest = r#"{ "contents": [
        { "type": "text", "name": "greeting", "url": "http://cdn.test/a.txt" },
        { "type": "hologram", "name": "skip", "url": "http://cdn.test/h" },
        { "type": "video", "name": "clip", "url": "http://cdn.test/v.mp4" },
        { "type": "image", "name": "missing", "url": "http://cdn.test/missing.png" }
    ] }"#;
    mock.respond("http://cdn.test/manifest.json", manifest);
    mock.respond("http://cdn.test/a.txt", "hi");

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    fetcher.fetch_manifest(
        "http://cdn.test/manifest.json",
        move |item, outcome| sink.borrow_mut().push((item.name.clone(), outcome.is_ok())),
        |message| panic!("manifest failed: {message}"),
    );
    assert!(fetcher.run_until_idle(TIMEOUT));

    assert_eq!(
        *seen.borrow(),
        vec![
            ("greeting".to_string(), true),
            ("clip".to_string(), true),
            ("missing".to_string(), false),
        ]
    );
    assert_eq!(mock.count_calls("http://cdn.test/h"), 0);
    assert_eq!(mock.count_calls("http://cdn.test/v.mp4"), 0);
}

#[test]
fn test_manifest_without_contents_fails() {
    let (fetcher, mock) = setup();
    mock.respond("http://cdn.test/bad.json", r#"{ "items": [] }"#);
    let recorder = Recorder::<()>::new();

    fetcher.fetch_manifest("http://cdn.test/bad.json", |_, _| {}, recorder.on_failure());
    fetcher.run_until_idle(TIMEOUT);
    assert_eq!(recorder.failures.get(), 1);
}

// ============================================================================
// Real HTTP client
// ============================================================================

#[test]
fn test_http_client_against_local_server() {
    let server = TestServer::builder()
        .route("Text.txt", "hello over http")
        .status("Image.png", 404)
        .serve(2)
        .unwrap();

    let config = FetchConfig::default()
        .with_base_url(server.base_url())
        .with_timeout(Duration::from_secs(5));
    let fetcher = AssetFetcher::new(config).unwrap();

    let text = Recorder::<String>::new();
    let image = Recorder::<Bitmap>::new();
    fetcher.fetch_text(text.on_success(), text.on_failure());
    fetcher.fetch_image(image.on_success(), image.on_failure());

    assert!(fetcher.run_until_idle(Duration::from_secs(10)));
    server.join();

    assert_eq!(text.value.borrow().as_deref(), Some("hello over http"));
    assert_eq!(image.failures.get(), 1);
    let message = image.message.borrow().clone().unwrap();
    assert!(message.contains("404"), "{message}");
}
