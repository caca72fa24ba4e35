//! Throttled window-resize notification

use crate::events::{event_types, Event, EventData, EventDispatcher};
use crate::throttle::Throttle;
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;
use whiteboard_platform::{ElementId, Host};

/// Turns raw resize notifications into one `wb.resize` event per burst
///
/// The event is dispatched on [`ElementId::WINDOW`] with the settled
/// viewport size.
#[derive(Clone)]
pub struct ResizeRelay {
    throttle: Throttle<()>,
}

impl ResizeRelay {
    pub fn new(host: Rc<dyn Host>, dispatcher: Rc<EventDispatcher>, delay: Duration) -> Self {
        let reader = Rc::clone(&host);
        let throttle = Throttle::new(host, delay, move |()| {
            let viewport = reader.viewport_size();
            debug!(width = viewport.width, height = viewport.height, "window resized");
            let mut event = Event::new(event_types::RESIZE, ElementId::WINDOW)
                .with_data(EventData::Resize {
                    width: viewport.width,
                    height: viewport.height,
                })
                .with_timestamp(reader.now());
            dispatcher.dispatch(&mut event);
        });

        Self { throttle }
    }

    /// Called by the host on every raw resize
    pub fn notify_resize(&self) {
        self.throttle.call(());
    }
}
