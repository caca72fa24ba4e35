//! Deterministic in-memory host
//!
//! `HeadlessHost` stands in for a browser window: frames only fire when
//! [`HeadlessHost::run_frame`] is called and time only moves through
//! [`HeadlessHost::advance`], so frame loops can be stepped exactly.
//!
//! Elements are laid out in document coordinates and scroll with the body.
//! Nested scroll containers keep their own `scroll_top` but do not move the
//! elements inside them.

use crate::geometry::{ElementId, Rect, ViewportSize};
use crate::host::{Document, FrameCallback, FrameHost, Host, TimerHost};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, Key, KeyData, SlotMap};
use std::cell::RefCell;
use std::time::Duration;
use tracing::trace;

new_key_type! {
    struct FrameKey;
    struct TimerKey;
}

/// Description of an element to add to a [`HeadlessHost`].
#[derive(Clone, Debug, Default)]
pub struct ElementSpec {
    selectors: Vec<String>,
    top: f64,
    left: f64,
    width: f64,
    height: f64,
    scroll_height: Option<f64>,
    data: FxHashMap<String, String>,
}

impl ElementSpec {
    /// Create an element matched by `selector` (e.g. `"#section"`).
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selectors: vec![selector.into()],
            ..Default::default()
        }
    }

    /// Add another selector that resolves to this element
    pub fn alias(mut self, selector: impl Into<String>) -> Self {
        self.selectors.push(selector.into());
        self
    }

    /// Absolute offset from the top of the document
    pub fn top(mut self, top: f64) -> Self {
        self.top = top;
        self
    }

    pub fn left(mut self, left: f64) -> Self {
        self.left = left;
        self
    }

    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Scrollable content height; defaults to the element height
    pub fn scroll_height(mut self, scroll_height: f64) -> Self {
        self.scroll_height = Some(scroll_height);
        self
    }

    /// Set a `data-*` attribute; `name` excludes the `data-` prefix
    pub fn data(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(name.into(), value.into());
        self
    }
}

struct HeadlessElement {
    selectors: Vec<String>,
    top: f64,
    left: f64,
    width: f64,
    height: f64,
    scroll_top: f64,
    scroll_height: f64,
    data: FxHashMap<String, String>,
    attached: bool,
}

struct PendingTimer {
    deadline: Duration,
    seq: u64,
    callback: FrameCallback,
}

struct HeadlessState {
    now: Duration,
    frame_interval: Duration,
    frames: SlotMap<FrameKey, FrameCallback>,
    frame_order: Vec<FrameKey>,
    timers: SlotMap<TimerKey, PendingTimer>,
    timer_seq: u64,
    frames_run: u64,
    viewport: ViewportSize,
    elements: Vec<HeadlessElement>,
    hash: String,
}

impl HeadlessState {
    fn element(&self, id: ElementId) -> Option<&HeadlessElement> {
        let index = (id.raw() as usize).checked_sub(1)?;
        self.elements.get(index).filter(|el| el.attached)
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut HeadlessElement> {
        let index = (id.raw() as usize).checked_sub(1)?;
        self.elements.get_mut(index).filter(|el| el.attached)
    }

    fn body(&self) -> &HeadlessElement {
        &self.elements[0]
    }
}

/// In-memory host with virtual time.
pub struct HeadlessHost {
    state: RefCell<HeadlessState>,
    native_frames: bool,
}

const BODY: ElementId = ElementId(1);

impl HeadlessHost {
    /// Host with native frame scheduling.
    pub fn new(viewport: ViewportSize) -> Self {
        Self::build(viewport, true)
    }

    /// Host without native frames, forcing the timer fallback.
    pub fn timer_only(viewport: ViewportSize) -> Self {
        Self::build(viewport, false)
    }

    fn build(viewport: ViewportSize, native_frames: bool) -> Self {
        let body = HeadlessElement {
            selectors: vec!["body".to_string()],
            top: 0.0,
            left: 0.0,
            width: viewport.width,
            height: viewport.height,
            scroll_top: 0.0,
            scroll_height: viewport.height,
            data: FxHashMap::default(),
            attached: true,
        };

        Self {
            state: RefCell::new(HeadlessState {
                now: Duration::ZERO,
                frame_interval: Duration::from_secs_f64(1.0 / 60.0),
                frames: SlotMap::with_key(),
                frame_order: Vec::new(),
                timers: SlotMap::with_key(),
                timer_seq: 0,
                frames_run: 0,
                viewport,
                elements: vec![body],
                hash: String::new(),
            }),
            native_frames,
        }
    }

    /// Virtual time that passes per [`run_frame`](Self::run_frame)
    pub fn set_frame_interval(&self, interval: Duration) {
        self.state.borrow_mut().frame_interval = interval;
    }

    pub fn add_element(&self, spec: ElementSpec) -> ElementId {
        let mut state = self.state.borrow_mut();
        state.elements.push(HeadlessElement {
            selectors: spec.selectors,
            top: spec.top,
            left: spec.left,
            width: spec.width,
            height: spec.height,
            scroll_top: 0.0,
            scroll_height: spec.scroll_height.unwrap_or(spec.height),
            data: spec.data,
            attached: true,
        });
        ElementId(state.elements.len() as u64)
    }

    /// Detach an element; it no longer resolves or measures.
    pub fn remove_element(&self, id: ElementId) {
        if id == BODY {
            return;
        }
        if let Some(el) = self.state.borrow_mut().element_mut(id) {
            el.attached = false;
        }
    }

    /// Move an element to a new absolute document offset
    pub fn move_element(&self, id: ElementId, top: f64) {
        if let Some(el) = self.state.borrow_mut().element_mut(id) {
            el.top = top;
        }
    }

    pub fn set_viewport(&self, viewport: ViewportSize) {
        let mut state = self.state.borrow_mut();
        state.viewport = viewport;
        let body = &mut state.elements[0];
        body.width = viewport.width;
        body.height = viewport.height;
    }

    /// Total height of the scrollable document
    pub fn set_document_height(&self, height: f64) {
        self.state.borrow_mut().elements[0].scroll_height = height;
    }

    /// Fire every frame callback requested before this call.
    ///
    /// Virtual time advances by one frame interval first, firing any timers
    /// that fall due. Callbacks requested while the frame runs wait for the
    /// next frame. Without native frames this only advances time.
    pub fn run_frame(&self) {
        let interval = self.state.borrow().frame_interval;
        self.advance(interval);

        if !self.native_frames {
            return;
        }

        let order = {
            let mut state = self.state.borrow_mut();
            state.frames_run += 1;
            trace!(
                frame = state.frames_run,
                queued = state.frame_order.len(),
                "headless frame"
            );
            std::mem::take(&mut state.frame_order)
        };

        for key in order {
            let callback = self.state.borrow_mut().frames.remove(key);
            if let Some(callback) = callback {
                callback();
            }
        }
    }

    pub fn run_frames(&self, count: usize) {
        for _ in 0..count {
            self.run_frame();
        }
    }

    /// Advance virtual time, firing due timers in deadline order.
    pub fn advance(&self, delta: Duration) {
        let target = self.state.borrow().now + delta;

        loop {
            let due = {
                let mut state = self.state.borrow_mut();
                let next = state
                    .timers
                    .iter()
                    .filter(|(_, timer)| timer.deadline <= target)
                    .min_by_key(|(_, timer)| (timer.deadline, timer.seq))
                    .map(|(key, _)| key);

                match next.and_then(|key| state.timers.remove(key)) {
                    Some(timer) => {
                        state.now = state.now.max(timer.deadline);
                        Some(timer.callback)
                    }
                    None => None,
                }
            };

            match due {
                Some(callback) => callback(),
                None => break,
            }
        }

        self.state.borrow_mut().now = target;
    }

    /// Number of frame callbacks waiting for the next frame
    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    pub fn has_native_frames(&self) -> bool {
        self.native_frames
    }
}

impl FrameHost for HeadlessHost {
    fn request_animation_frame(&self, callback: FrameCallback) -> u64 {
        let mut state = self.state.borrow_mut();
        let key = state.frames.insert(callback);
        state.frame_order.push(key);
        key.data().as_ffi()
    }

    fn cancel_animation_frame(&self, id: u64) {
        let key = FrameKey::from(KeyData::from_ffi(id));
        self.state.borrow_mut().frames.remove(key);
    }
}

impl TimerHost for HeadlessHost {
    fn set_timeout(&self, delay: Duration, callback: FrameCallback) -> u64 {
        let mut state = self.state.borrow_mut();
        state.timer_seq += 1;
        let timer = PendingTimer {
            deadline: state.now + delay,
            seq: state.timer_seq,
            callback,
        };
        state.timers.insert(timer).data().as_ffi()
    }

    fn clear_timeout(&self, id: u64) {
        let key = TimerKey::from(KeyData::from_ffi(id));
        self.state.borrow_mut().timers.remove(key);
    }

    fn now(&self) -> Duration {
        self.state.borrow().now
    }
}

impl Document for HeadlessHost {
    fn viewport_size(&self) -> ViewportSize {
        self.state.borrow().viewport
    }

    fn window_scroll_top(&self) -> f64 {
        self.state.borrow().body().scroll_top
    }

    fn body(&self) -> ElementId {
        BODY
    }

    fn query(&self, selector: &str) -> Option<ElementId> {
        let state = self.state.borrow();
        state
            .elements
            .iter()
            .position(|el| el.attached && el.selectors.iter().any(|s| s == selector))
            .map(|index| ElementId(index as u64 + 1))
    }

    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        let state = self.state.borrow();
        let el = state.element(element)?;
        let scroll = state.body().scroll_top;

        if element == BODY {
            return Some(Rect::new(-scroll, 0.0, el.width, el.scroll_height));
        }

        Some(Rect::new(el.top - scroll, el.left, el.width, el.height))
    }

    fn offset_top(&self, element: ElementId) -> Option<f64> {
        self.state.borrow().element(element).map(|el| el.top)
    }

    fn scroll_top(&self, container: ElementId) -> f64 {
        self.state
            .borrow()
            .element(container)
            .map_or(0.0, |el| el.scroll_top)
    }

    fn set_scroll_top(&self, container: ElementId, value: f64) {
        let mut state = self.state.borrow_mut();
        if let Some(el) = state.element_mut(container) {
            // Browsers clamp to the scrollable range
            let max = (el.scroll_height - el.height).max(0.0);
            el.scroll_top = value.clamp(0.0, max);
        }
    }

    fn scroll_height(&self, container: ElementId) -> f64 {
        self.state
            .borrow()
            .element(container)
            .map_or(0.0, |el| el.scroll_height)
    }

    fn location_hash(&self) -> String {
        self.state.borrow().hash.clone()
    }

    fn set_location_hash(&self, hash: &str) {
        self.state.borrow_mut().hash = hash.to_string();
    }

    fn data_attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.state
            .borrow()
            .element(element)
            .and_then(|el| el.data.get(name).cloned())
    }
}

impl Host for HeadlessHost {
    fn frames(&self) -> Option<&dyn FrameHost> {
        if self.native_frames {
            Some(self)
        } else {
            None
        }
    }
}
