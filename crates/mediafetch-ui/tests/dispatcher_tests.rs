//! Dispatcher behavior with requests held in flight.

use std::sync::Arc;

use mediafetch_assets::{AssetFetcher, AssetKind, FetchConfig};
use mediafetch_core::math::Vec3;
use mediafetch_test_utils::{MockTransport, fixtures};
use mediafetch_ui::{Panels, Screen, UiDispatcher};

const BASE: &str = "http://assets.test/";

fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

fn setup() -> (UiDispatcher, Arc<MockTransport>) {
    let mock = Arc::new(MockTransport::new());
    mock.respond(url("Text.txt"), "hello");
    mock.respond(url("Image.png"), fixtures::png_bytes(16, 8).unwrap());
    mock.respond(url("Character.glb"), fixtures::glb(true));

    let fetcher = AssetFetcher::builder(FetchConfig::default().with_base_url(BASE))
        .shared_transport(mock.clone())
        .build()
        .unwrap();

    let mut ui = UiDispatcher::new(fetcher);
    ui.start();
    (ui, mock)
}

fn tick_many(ui: &UiDispatcher) {
    for _ in 0..10 {
        ui.tick();
    }
}

#[test]
fn test_switching_kind_discards_in_flight_result() {
    let (mut ui, mock) = setup();
    mock.hold(url("Text.txt"));

    ui.load();
    ui.tick();
    assert!(ui.state().is_loading());
    assert_eq!(mock.pending_count(), 1);

    ui.select(AssetKind::Image);
    assert!(ui.fetcher().is_idle());
    assert!(!ui.state().is_loading());

    ui.tick();
    mock.release_all();
    tick_many(&ui);

    let state = ui.state();
    assert!(state.text.is_empty());
    assert!(!state.is_failed());
    assert_eq!(state.panels.content(), Panels::IMAGE);
}

#[test]
fn test_switching_kind_discards_in_flight_failure() {
    let (mut ui, mock) = setup();
    mock.fail(url("Character.glb"), 500);
    mock.hold(url("Character.glb"));

    ui.select(AssetKind::Model);
    ui.load();
    ui.tick();

    ui.select_index(0);
    ui.tick();
    mock.release_all();
    tick_many(&ui);

    assert!(!ui.state().is_failed());
    assert!(ui.state().last_error.is_none());
}

#[test]
fn test_image_load_sizes_surface() {
    let (mut ui, _mock) = setup();
    ui.select(AssetKind::Image);
    ui.load();
    tick_many(&ui);

    let state = ui.state();
    assert!(state.image.is_visible());
    assert_eq!(state.image.size(), (16, 8));
    assert_eq!(state.panels, Panels::IMAGE);
}

#[test]
fn test_model_load_attaches_flipped_model() {
    let (mut ui, _mock) = setup();
    ui.select(AssetKind::Model);
    ui.load();
    tick_many(&ui);

    let state = ui.state();
    assert_eq!(state.model_anchor.len(), 1);
    let model = &state.model_anchor.children()[0];
    assert!((model.root.transform.forward() - Vec3::NEG_Z).length() < 1e-5);
    assert_eq!(model.playing().map(|c| c.name.as_str()), Some(fixtures::ANIMATION_NAME));
}

#[test]
fn test_retry_after_failure_reissues_request() {
    let (mut ui, mock) = setup();
    mock.fail(url("Text.txt"), 503);

    ui.load();
    tick_many(&ui);
    assert!(ui.state().is_failed());

    mock.respond(url("Text.txt"), "back online");
    assert!(ui.retry());
    assert!(!ui.state().is_failed());
    tick_many(&ui);

    let state = ui.state();
    assert_eq!(state.text, "back online");
    assert_eq!(state.screen, Screen::Demonstration);
    assert_eq!(mock.count_calls(&url("Text.txt")), 2);
}

#[test]
fn test_reset_while_loading_hides_indicator() {
    let (mut ui, mock) = setup();
    mock.hold(url("Text.txt"));

    ui.load();
    ui.tick();
    ui.reset();

    assert!(!ui.state().is_loading());
    mock.release_all();
    tick_many(&ui);
    assert!(ui.state().text.is_empty());
}

#[test]
fn test_switching_kinds_clears_previous_content() {
    let (mut ui, _mock) = setup();

    ui.select(AssetKind::Model);
    ui.load();
    tick_many(&ui);
    assert_eq!(ui.state().model_anchor.len(), 1);

    ui.select(AssetKind::VideoUrl);
    ui.load();
    let state = ui.state();
    assert!(state.model_anchor.is_empty());
    assert!(state.video.is_playing());
    assert_eq!(state.panels, Panels::VIDEO);
}
