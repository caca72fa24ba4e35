//! Host capability traits
//!
//! Everything the runtime needs from its environment goes through these
//! traits. All of them are used from a single UI thread, so none require
//! `Send` or `Sync`.

use crate::geometry::{ElementId, Rect, ViewportSize};
use std::time::Duration;

/// One-shot callback fired by a frame or timer.
pub type FrameCallback = Box<dyn FnOnce()>;

/// Native display-aligned frame scheduling.
pub trait FrameHost {
    /// Run `callback` once before the next repaint. Returns a host id.
    fn request_animation_frame(&self, callback: FrameCallback) -> u64;

    /// Drop a pending frame callback. Unknown or stale ids are ignored.
    fn cancel_animation_frame(&self, id: u64);
}

/// Timer primitives, always available.
pub trait TimerHost {
    /// Run `callback` once after `delay`. Returns a host id.
    fn set_timeout(&self, delay: Duration, callback: FrameCallback) -> u64;

    /// Drop a pending timeout. Unknown or stale ids are ignored.
    fn clear_timeout(&self, id: u64);

    /// Monotonic time since the host started.
    fn now(&self) -> Duration;
}

/// Query and measurement surface of a page-like document.
pub trait Document {
    fn viewport_size(&self) -> ViewportSize;

    /// Vertical scroll offset of the window.
    fn window_scroll_top(&self) -> f64;

    /// The default scroll container.
    fn body(&self) -> ElementId;

    /// Resolve a selector to at most one element.
    fn query(&self, selector: &str) -> Option<ElementId>;

    /// Bounding box relative to the viewport, `None` when the element is gone.
    fn bounding_rect(&self, element: ElementId) -> Option<Rect>;

    /// Absolute vertical offset from the top of the document.
    fn offset_top(&self, element: ElementId) -> Option<f64>;

    fn scroll_top(&self, container: ElementId) -> f64;

    fn set_scroll_top(&self, container: ElementId, value: f64);

    /// Total scrollable content height of a container.
    fn scroll_height(&self, container: ElementId) -> f64;

    /// Current URL fragment including the leading `#`, or empty.
    fn location_hash(&self) -> String;

    fn set_location_hash(&self, hash: &str);

    /// Raw value of a `data-*` attribute; `name` excludes the `data-` prefix.
    fn data_attribute(&self, element: ElementId, name: &str) -> Option<String>;
}

/// A complete host environment.
pub trait Host: Document + TimerHost {
    /// Native frame scheduling, when the host has it.
    fn frames(&self) -> Option<&dyn FrameHost> {
        None
    }
}
