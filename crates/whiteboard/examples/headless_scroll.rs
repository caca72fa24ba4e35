//! Headless Scroll Demo
//!
//! Drives a simulated page without a browser:
//! - Watches two sections and logs when they enter or leave the viewport
//! - Smooth-scrolls to a section, then back up by half a viewport
//! - Reports a throttled resize
//!
//! Run with: RUST_LOG=whiteboard=debug cargo run -p whiteboard --example headless_scroll

use std::rc::Rc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use whiteboard::prelude::*;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let host = Rc::new(HeadlessHost::new(ViewportSize::new(1280.0, 720.0)));
    host.set_document_height(5000.0);
    let features = host.add_element(ElementSpec::new("#features").top(1400.0).size(1280.0, 600.0));
    let contact = host.add_element(ElementSpec::new("#contact").top(4200.0).size(1280.0, 500.0));

    let wb = Whiteboard::with_config(
        host.clone(),
        WhiteboardConfig::from_toml_str(
            r#"
            [scroll]
            duration = 600.0
            "#,
        )?,
    );

    for (element, name) in [(features, "#features"), (contact, "#contact")] {
        wb.on(element, event_types::APPEAR, move |_| tracing::info!("{name} appeared"));
        wb.on(element, event_types::DISAPPEAR, move |_| tracing::info!("{name} disappeared"));
        wb.watch(element);
    }
    wb.on(ElementId::WINDOW, event_types::RESIZE, |event| {
        if let EventData::Resize { width, height } = event.data {
            tracing::info!(width, height, "resized");
        }
    });

    host.run_frame();

    let scroll = wb.scroll_to(
        "#features",
        wb.scroll_options(),
        AnimationCallbacks::new()
            .on_finish(|state| tracing::info!(position = state.value, "arrived")),
    )?;
    while scroll.is_running() {
        host.run_frame();
    }
    tracing::info!(hash = %host.location_hash(), "after scrolling to #features");

    let scroll = wb.scroll_to("-=50vh", wb.scroll_options(), AnimationCallbacks::new())?;
    while scroll.is_running() {
        host.run_frame();
    }
    tracing::info!(position = host.window_scroll_top(), "after scrolling up");

    for width in [1200.0, 1100.0, 1024.0] {
        host.set_viewport(ViewportSize::new(width, 768.0));
        wb.notify_resize();
        host.advance(Duration::from_millis(20));
    }
    host.advance(wb.config().throttle_delay());

    Ok(())
}
