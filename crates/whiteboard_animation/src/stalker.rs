//! Viewport visibility watcher
//!
//! Watched elements get `wb.appear` when they enter the vertical viewport
//! band and `wb.disappear` when they leave it. One shared tick loop checks
//! every entry once per frame.
//!
//! ```rust
//! use std::rc::Rc;
//! use whiteboard_animation::ViewportWatcher;
//! use whiteboard_core::events::event_types::APPEAR;
//! use whiteboard_core::{EventDispatcher, FrameClock, TickLoop};
//! use whiteboard_platform::{ElementSpec, HeadlessHost, Host, ViewportSize};
//!
//! let host = Rc::new(HeadlessHost::new(ViewportSize::new(800.0, 600.0)));
//! let title = host.add_element(ElementSpec::new("#page-title").top(100.0).size(800.0, 40.0));
//!
//! let ticks = TickLoop::new(FrameClock::new(host.clone() as Rc<dyn Host>));
//! let dispatcher = Rc::new(EventDispatcher::new());
//! dispatcher.register(title, APPEAR, |_| println!("Page title appeared!"));
//!
//! let watcher = ViewportWatcher::new(&ticks, dispatcher);
//! watcher.watch(title);
//! host.run_frame();
//! assert_eq!(watcher.visibility(title), Some(true));
//! ```

use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, trace};
use whiteboard_core::events::event_types::{APPEAR, DISAPPEAR};
use whiteboard_core::{EventDispatcher, TickHandle, TickLoop};
use whiteboard_platform::{Document, ElementId};

struct WatchEntry {
    element: ElementId,
    /// `None` until the first check
    visible: Cell<Option<bool>>,
    removed: Cell<bool>,
}

type Registry = Rc<RefCell<Vec<Rc<WatchEntry>>>>;

/// Emits appear/disappear events for watched elements
///
/// Dropping the watcher stops its loop.
pub struct ViewportWatcher {
    entries: Registry,
    tick: TickHandle,
}

impl ViewportWatcher {
    /// Start watching on `ticks`; events go through `dispatcher`
    pub fn new(ticks: &TickLoop, dispatcher: Rc<EventDispatcher>) -> Self {
        let entries: Registry = Rc::default();
        let registry = Rc::clone(&entries);
        let host = Rc::clone(ticks.host());

        let tick = ticks.run(move |ctx| {
            // Snapshot so listeners can watch/unwatch while we iterate
            let snapshot: SmallVec<[Rc<WatchEntry>; 8]> =
                registry.borrow().iter().cloned().collect();

            for entry in snapshot {
                if entry.removed.get() {
                    continue;
                }

                let visible = is_visible(host.as_ref(), entry.element, ctx.window_height);
                if entry.visible.get() == Some(visible) {
                    continue;
                }

                trace!(element = entry.element.raw(), visible, "visibility changed");
                let event_type = if visible { APPEAR } else { DISAPPEAR };
                dispatcher.emit(entry.element, event_type, host.now());
                entry.visible.set(Some(visible));
            }
        });

        Self { entries, tick }
    }

    /// Add an entry for `element` with unknown visibility
    pub fn watch(&self, element: ElementId) {
        debug!(element = element.raw(), "watching element");
        self.entries.borrow_mut().push(Rc::new(WatchEntry {
            element,
            visible: Cell::new(None),
            removed: Cell::new(false),
        }));
    }

    /// Remove the first entry for `element`. Returns whether one was found.
    pub fn unwatch(&self, element: ElementId) -> bool {
        let mut entries = self.entries.borrow_mut();
        match entries.iter().position(|entry| entry.element == element) {
            Some(index) => {
                let entry = entries.remove(index);
                entry.removed.set(true);
                debug!(element = element.raw(), "unwatched element");
                true
            }
            None => false,
        }
    }

    /// Last known visibility of the first entry for `element`
    pub fn visibility(&self, element: ElementId) -> Option<bool> {
        self.entries
            .borrow()
            .iter()
            .find(|entry| entry.element == element)
            .and_then(|entry| entry.visible.get())
    }

    pub fn is_watching(&self, element: ElementId) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|entry| entry.element == element)
    }

    /// Number of entries, duplicates included
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Drop for ViewportWatcher {
    fn drop(&mut self) {
        self.tick.cancel();
    }
}

fn is_visible<D>(document: &D, element: ElementId, viewport_height: f64) -> bool
where
    D: Document + ?Sized,
{
    document
        .bounding_rect(element)
        .is_some_and(|rect| rect.intersects_vertical_band(viewport_height))
}
