//! Whiteboard
//!
//! Frame-driven utilities for page-like hosts, wired to one host:
//!
//! - **Tick loops** with scroll and viewport snapshots
//! - **Animations** with named easings and change/finish callbacks
//! - **Smooth scrolling** to pixels, `vh`, percentages, relative offsets or elements
//! - **Viewport watching** with `wb.appear` / `wb.disappear` events
//! - **Throttled resize** notification and `data-*` attribute options
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use whiteboard::prelude::*;
//!
//! let host = Rc::new(HeadlessHost::new(ViewportSize::new(800.0, 600.0)));
//! host.set_document_height(3000.0);
//! let about = host.add_element(ElementSpec::new("#about").top(1200.0));
//!
//! let wb = Whiteboard::new(host.clone());
//! wb.on(about, event_types::APPEAR, |_| println!("about section visible"));
//! wb.watch(about);
//!
//! wb.scroll_to("#about", wb.scroll_options(), AnimationCallbacks::new())
//!     .unwrap();
//! host.run_frames(60);
//!
//! assert_eq!(host.window_scroll_top(), 1200.0);
//! assert_eq!(host.location_hash(), "#about");
//! ```

mod config;
mod error;

pub use config::WhiteboardConfig;
pub use error::{Result, WhiteboardError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::OnceCell;
use std::rc::Rc;
use tracing::debug;
use whiteboard_animation::{
    AnimationCallbacks, AnimationHandle, AnimationOptions, Animator, EasingTable, ScrollOptions,
    ScrollTarget, Scroller, SharedEasingTable, ViewportWatcher,
};
use whiteboard_core::{
    Event, EventDispatcher, EventType, FrameClock, ListenerId, ResizeRelay, TickContext,
    TickHandle, TickLoop, Throttle,
};
use whiteboard_platform::{ElementId, Host};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::{Result, Whiteboard, WhiteboardConfig, WhiteboardError};

    pub use whiteboard_animation::{
        AnimationCallbacks, AnimationHandle, AnimationOptions, AnimationState, Easing,
        ScrollOptions, ScrollTarget,
    };
    pub use whiteboard_core::events::event_types;
    pub use whiteboard_core::{Event, EventData, TickContext, TickHandle};
    pub use whiteboard_platform::{
        Document, ElementId, ElementSpec, HeadlessHost, Host, Rect, ViewportSize,
    };
}

/// All whiteboard services bound to one host
pub struct Whiteboard {
    host: Rc<dyn Host>,
    config: WhiteboardConfig,
    ticks: TickLoop,
    dispatcher: Rc<EventDispatcher>,
    easings: SharedEasingTable,
    scroller: Scroller,
    stalker: OnceCell<ViewportWatcher>,
    resize: ResizeRelay,
}

impl Whiteboard {
    pub fn new(host: Rc<dyn Host>) -> Self {
        Self::with_config(host, WhiteboardConfig::default())
    }

    pub fn with_config(host: Rc<dyn Host>, config: WhiteboardConfig) -> Self {
        let clock = FrameClock::with_frame_rate(Rc::clone(&host), config.frame_rate);
        debug!(mode = ?clock.mode(), frame_rate = clock.frame_rate(), "whiteboard created");

        let ticks = TickLoop::new(clock);
        let dispatcher = Rc::new(EventDispatcher::new());
        let easings = EasingTable::standard().shared();
        let scroller = Scroller::new(Animator::new(ticks.clone(), Rc::clone(&easings)));
        let resize = ResizeRelay::new(
            Rc::clone(&host),
            Rc::clone(&dispatcher),
            config.throttle_delay(),
        );

        Self {
            host,
            config,
            ticks,
            dispatcher,
            easings,
            scroller,
            stalker: OnceCell::new(),
            resize,
        }
    }

    /// Run `callback` every frame until stopped
    pub fn tick<F>(&self, callback: F) -> TickHandle
    where
        F: FnMut(&TickContext<'_>) + 'static,
    {
        self.ticks.run(callback)
    }

    pub fn animate(
        &self,
        options: AnimationOptions,
        callbacks: AnimationCallbacks,
    ) -> Result<AnimationHandle> {
        Ok(self.scroller.animator().animate(options, callbacks)?)
    }

    /// Smooth-scroll to `target`; see [`ScrollTarget`] for the accepted forms
    pub fn scroll_to(
        &self,
        target: impl Into<ScrollTarget>,
        options: ScrollOptions,
        callbacks: AnimationCallbacks,
    ) -> Result<AnimationHandle> {
        Ok(self.scroller.scroll_to(target, options, callbacks)?)
    }

    /// Configured scroll defaults, to adjust per call
    pub fn scroll_options(&self) -> ScrollOptions {
        self.config.scroll.clone()
    }

    /// Emit appear/disappear events for `element`. Starts the watcher on first use.
    pub fn watch(&self, element: ElementId) {
        self.stalker
            .get_or_init(|| ViewportWatcher::new(&self.ticks, Rc::clone(&self.dispatcher)))
            .watch(element);
    }

    /// Stop watching the first entry for `element`
    pub fn unwatch(&self, element: ElementId) -> bool {
        self.stalker
            .get()
            .is_some_and(|stalker| stalker.unwatch(element))
    }

    /// Last known visibility of a watched element
    pub fn visibility(&self, element: ElementId) -> Option<bool> {
        self.stalker.get().and_then(|stalker| stalker.visibility(element))
    }

    /// Listen for `event_type` on `target`
    pub fn on<F>(&self, target: ElementId, event_type: EventType, handler: F) -> ListenerId
    where
        F: Fn(&mut Event) + 'static,
    {
        self.dispatcher.register(target, event_type, handler)
    }

    pub fn off(&self, listener: ListenerId) -> bool {
        self.dispatcher.unregister(listener)
    }

    /// Wrap `callback` in a throttle with the configured delay
    pub fn throttle<A, F>(&self, callback: F) -> Throttle<A>
    where
        A: 'static,
        F: FnMut(A) + 'static,
    {
        Throttle::new(Rc::clone(&self.host), self.config.throttle_delay(), callback)
    }

    /// To be called by the host on every window resize
    pub fn notify_resize(&self) {
        self.resize.notify_resize();
    }

    /// Options for `element` from `defaults` and its `data-*` attributes
    pub fn options_from_data<T>(&self, element: ElementId, defaults: &T) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        Ok(whiteboard_core::options_from_data(
            self.host.as_ref(),
            element,
            defaults,
            Some(&self.config.data_prefix),
        )?)
    }

    /// Make a custom easing available by name to animations and scrolls
    pub fn register_easing<F>(&self, name: impl Into<String>, function: F)
    where
        F: Fn(f64, f64, f64, f64) -> f64 + 'static,
    {
        self.easings.borrow_mut().register(name, function);
    }

    pub fn host(&self) -> &Rc<dyn Host> {
        &self.host
    }

    pub fn config(&self) -> &WhiteboardConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Rc<EventDispatcher> {
        &self.dispatcher
    }

    pub fn easings(&self) -> &SharedEasingTable {
        &self.easings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use whiteboard_platform::{HeadlessHost, ViewportSize};

    #[test]
    fn test_unwatch_before_watch_is_noop() {
        let host = Rc::new(HeadlessHost::new(ViewportSize::new(800.0, 600.0)));
        let wb = Whiteboard::new(host.clone());

        assert!(!wb.unwatch(ElementId(7)));
        assert_eq!(wb.visibility(ElementId(7)), None);
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn test_watcher_starts_once() {
        let host = Rc::new(HeadlessHost::new(ViewportSize::new(800.0, 600.0)));
        let wb = Whiteboard::new(host.clone());

        wb.watch(ElementId(2));
        wb.watch(ElementId(3));
        assert_eq!(host.pending_frames(), 1);
    }

    #[test]
    fn test_registered_easing_is_used() {
        let host = Rc::new(HeadlessHost::new(ViewportSize::new(800.0, 600.0)));
        let wb = Whiteboard::new(host.clone());
        let calls = Rc::new(Cell::new(0));

        let c = calls.clone();
        wb.register_easing("step", move |elapsed, from, range, duration| {
            c.set(c.get() + 1);
            if elapsed < duration {
                from
            } else {
                from + range
            }
        });

        let handle = wb
            .animate(
                AnimationOptions::new(0.0, 5.0)
                    .with_duration(50.0)
                    .with_easing("step"),
                AnimationCallbacks::new(),
            )
            .unwrap();
        assert_eq!(handle.value(), 0.0);

        host.run_frames(5);
        assert_eq!(handle.value(), 5.0);
        assert!(calls.get() >= 3);
    }

    #[test]
    fn test_frame_rate_from_config() {
        let host = Rc::new(HeadlessHost::timer_only(ViewportSize::new(800.0, 600.0)));
        let config = WhiteboardConfig {
            frame_rate: 20.0,
            ..Default::default()
        };
        let wb = Whiteboard::with_config(host, config);

        let handle = wb
            .animate(
                AnimationOptions::new(0.0, 1.0).with_duration(100.0),
                AnimationCallbacks::new(),
            )
            .unwrap();
        // 50ms per tick
        assert_eq!(handle.value(), 0.5);
    }
}
