use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use whiteboard::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn page() -> Rc<HeadlessHost> {
    init_tracing();
    let host = Rc::new(HeadlessHost::new(ViewportSize::new(1024.0, 600.0)));
    host.set_document_height(4000.0);
    host
}

#[test]
fn scrolling_to_a_section_reveals_it() {
    let host = page();
    let about = host.add_element(ElementSpec::new("#about").top(1800.0).size(1024.0, 400.0));
    let wb = Whiteboard::new(host.clone());

    let seen = Rc::new(RefCell::new(Vec::new()));
    for event_type in [event_types::APPEAR, event_types::DISAPPEAR] {
        let seen = seen.clone();
        wb.on(about, event_type, move |event| {
            seen.borrow_mut().push(event_types::name(event.event_type))
        });
    }

    wb.watch(about);
    host.run_frame();
    assert_eq!(*seen.borrow(), vec!["wb.disappear"]);

    let handle = wb
        .scroll_to("#about", wb.scroll_options(), AnimationCallbacks::new())
        .unwrap();
    host.run_frames(60);

    assert!(handle.is_done());
    assert_eq!(host.window_scroll_top(), 1800.0);
    assert_eq!(host.location_hash(), "#about");
    assert_eq!(*seen.borrow(), vec!["wb.disappear", "wb.appear"]);
    assert_eq!(wb.visibility(about), Some(true));
}

#[test]
fn relative_scroll_chain() {
    let host = page();
    let wb = Whiteboard::new(host.clone());
    let options = wb.scroll_options().with_duration(100.0);

    wb.scroll_to("+=50vh", options.clone(), AnimationCallbacks::new()).unwrap();
    host.run_frames(10);
    assert_eq!(host.window_scroll_top(), 300.0);

    wb.scroll_to("-=100", options.clone(), AnimationCallbacks::new()).unwrap();
    host.run_frames(10);
    assert_eq!(host.window_scroll_top(), 200.0);

    wb.scroll_to("", options, AnimationCallbacks::new()).unwrap();
    host.run_frames(10);
    assert_eq!(host.window_scroll_top(), 0.0);
}

#[test]
fn resize_burst_emits_single_event() {
    let host = page();
    let wb = Whiteboard::new(host.clone());

    let sizes = Rc::new(RefCell::new(Vec::new()));
    let s = sizes.clone();
    wb.on(ElementId::WINDOW, event_types::RESIZE, move |event| {
        if let EventData::Resize { width, height } = event.data {
            s.borrow_mut().push((width, height));
        }
    });

    for width in [900.0, 800.0, 700.0] {
        host.set_viewport(ViewportSize::new(width, 500.0));
        wb.notify_resize();
        host.advance(Duration::from_millis(50));
    }
    assert!(sizes.borrow().is_empty());

    host.advance(Duration::from_millis(150));
    assert_eq!(*sizes.borrow(), vec![(700.0, 500.0)]);
}

#[test]
fn tick_loop_sees_scroll_and_viewport() {
    let host = page();
    let wb = Whiteboard::new(host.clone());
    let frames = Rc::new(RefCell::new(Vec::new()));

    let f = frames.clone();
    let handle = wb.tick(move |ctx| {
        f.borrow_mut().push((ctx.scroll, ctx.window_height));
        if ctx.scroll >= 100.0 {
            ctx.stop();
        }
    });

    host.set_scroll_top(host.body(), 40.0);
    host.run_frame();
    host.set_scroll_top(host.body(), 100.0);
    host.run_frames(3);

    assert!(!handle.is_running());
    assert_eq!(
        *frames.borrow(),
        vec![(0.0, 600.0), (40.0, 600.0), (100.0, 600.0)]
    );
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CarouselOptions {
    interval: u32,
    pause_on_hover: bool,
    theme: String,
    breakpoints: Vec<u32>,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            interval: 5000,
            pause_on_hover: true,
            theme: "light".to_string(),
            breakpoints: vec![],
        }
    }
}

#[test]
fn data_attributes_override_defaults() {
    let host = page();
    let carousel = host.add_element(
        ElementSpec::new("#carousel")
            .data("wb-interval", "4000")
            .data("wb-pause-on-hover", "false")
            .data("wb-breakpoints", "[480, 960]")
            .data("wb-unrelated", "ignored"),
    );
    let wb = Whiteboard::new(host);

    let options = wb
        .options_from_data(carousel, &CarouselOptions::default())
        .unwrap();
    assert_eq!(
        options,
        CarouselOptions {
            interval: 4000,
            pause_on_hover: false,
            theme: "light".to_string(),
            breakpoints: vec![480, 960],
        }
    );
}

#[test]
fn data_attribute_type_mismatch_is_an_error() {
    let host = page();
    let carousel = host.add_element(ElementSpec::new("#carousel").data("wb-interval", "soon"));
    let wb = Whiteboard::new(host);

    let err = wb
        .options_from_data(carousel, &CarouselOptions::default())
        .unwrap_err();
    assert!(matches!(err, WhiteboardError::Core(_)));
}

#[test]
fn custom_data_prefix_from_config() {
    let host = page();
    let carousel = host.add_element(
        ElementSpec::new("#carousel")
            .data("wb-interval", "4000")
            .data("ui-interval", "2500"),
    );
    let config = WhiteboardConfig::from_toml_str("data_prefix = \"ui-\"").unwrap();
    let wb = Whiteboard::with_config(host, config);

    let options = wb
        .options_from_data(carousel, &CarouselOptions::default())
        .unwrap();
    assert_eq!(options.interval, 2500);
}

#[test]
fn throttle_uses_configured_delay() {
    let host = page();
    let config = WhiteboardConfig::from_toml_str("throttle_delay_ms = 300").unwrap();
    let wb = Whiteboard::with_config(host.clone(), config);

    let fired = Rc::new(RefCell::new(Vec::new()));
    let f = fired.clone();
    let throttled = wb.throttle(move |query: String| f.borrow_mut().push(query));

    throttled.call("w".to_string());
    throttled.call("wh".to_string());
    host.advance(Duration::from_millis(200));
    throttled.call("whi".to_string());
    host.advance(Duration::from_millis(299));
    assert!(fired.borrow().is_empty());

    host.advance(Duration::from_millis(1));
    assert_eq!(*fired.borrow(), vec!["whi".to_string()]);
}

#[test]
fn unknown_easing_surfaces_as_error() {
    let host = page();
    let wb = Whiteboard::new(host.clone());

    let err = wb
        .scroll_to(
            500,
            wb.scroll_options().with_easing("easeOutBounce"),
            AnimationCallbacks::new(),
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "Unknown easing: easeOutBounce");
    assert_eq!(host.pending_frames(), 0);
}

#[test]
fn nan_scroll_duration_from_config_jumps_and_finishes() {
    let host = page();
    let config = WhiteboardConfig::from_toml_str("[scroll]\nduration = nan").unwrap();
    let wb = Whiteboard::with_config(host.clone(), config);

    let handle = wb
        .scroll_to(500, wb.scroll_options(), AnimationCallbacks::new())
        .unwrap();
    host.run_frames(3);

    assert!(handle.is_done());
    assert!(!handle.is_running());
    assert_eq!(host.window_scroll_top(), 500.0);
    assert_eq!(host.pending_frames(), 0);
}
