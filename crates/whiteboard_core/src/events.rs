//! Event dispatch system
//!
//! Named events delivered to listeners registered per element.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use whiteboard_platform::ElementId;

/// Event type identifier
pub type EventType = u32;

/// Built-in event types
pub mod event_types {
    use super::EventType;

    /// Element entered the viewport
    pub const APPEAR: EventType = 1;
    /// Element left the viewport
    pub const DISAPPEAR: EventType = 2;
    /// Window size settled after a burst of resizes
    pub const RESIZE: EventType = 40;

    /// Qualified name, as seen by page scripts
    pub fn name(event_type: EventType) -> &'static str {
        match event_type {
            APPEAR => "wb.appear",
            DISAPPEAR => "wb.disappear",
            RESIZE => "wb.resize",
            _ => "wb.custom",
        }
    }
}

/// An event with associated data
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    pub target: ElementId,
    pub data: EventData,
    pub timestamp: Duration,
    pub propagation_stopped: bool,
}

/// Event-specific data
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    Resize { width: f64, height: f64 },
    None,
}

impl Event {
    pub fn new(event_type: EventType, target: ElementId) -> Self {
        Self {
            event_type,
            target,
            data: EventData::None,
            timestamp: Duration::ZERO,
            propagation_stopped: false,
        }
    }

    pub fn with_data(mut self, data: EventData) -> Self {
        self.data = data;
        self
    }

    pub fn with_timestamp(mut self, timestamp: Duration) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Skip the remaining listeners
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

new_key_type! {
    /// Registration token returned by [`EventDispatcher::register`]
    pub struct ListenerId;
}

/// Event handler function type
pub type EventHandler = Rc<dyn Fn(&mut Event)>;

struct Listener {
    target: ElementId,
    event_type: EventType,
    handler: EventHandler,
}

#[derive(Default)]
struct DispatcherState {
    listeners: SlotMap<ListenerId, Listener>,
    by_target: FxHashMap<(ElementId, EventType), Vec<ListenerId>>,
}

/// Dispatches events to registered handlers
///
/// Handlers may register or unregister listeners while an event is being
/// delivered: a listener removed mid-dispatch is skipped, one added
/// mid-dispatch first sees the next event.
#[derive(Default)]
pub struct EventDispatcher {
    state: RefCell<DispatcherState>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event handler for an element and event type
    pub fn register<F>(&self, target: ElementId, event_type: EventType, handler: F) -> ListenerId
    where
        F: Fn(&mut Event) + 'static,
    {
        let mut state = self.state.borrow_mut();
        let id = state.listeners.insert(Listener {
            target,
            event_type,
            handler: Rc::new(handler),
        });
        state
            .by_target
            .entry((target, event_type))
            .or_default()
            .push(id);
        id
    }

    /// Remove a listener. Unknown ids are ignored.
    pub fn unregister(&self, id: ListenerId) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(listener) = state.listeners.remove(id) else {
            return false;
        };

        let key = (listener.target, listener.event_type);
        if let Some(ids) = state.by_target.get_mut(&key) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                state.by_target.remove(&key);
            }
        }
        true
    }

    /// Dispatch an event to all registered handlers in registration order
    pub fn dispatch(&self, event: &mut Event) {
        let handlers: SmallVec<[(ListenerId, EventHandler); 4]> = {
            let state = self.state.borrow();
            match state.by_target.get(&(event.target, event.event_type)) {
                Some(ids) => ids
                    .iter()
                    .filter_map(|id| {
                        state
                            .listeners
                            .get(*id)
                            .map(|l| (*id, Rc::clone(&l.handler)))
                    })
                    .collect(),
                None => return,
            }
        };

        for (id, handler) in handlers {
            if event.propagation_stopped {
                break;
            }
            if !self.state.borrow().listeners.contains_key(id) {
                continue;
            }
            handler(event);
        }
    }

    /// Build and dispatch an event without payload
    pub fn emit(&self, target: ElementId, event_type: EventType, timestamp: Duration) {
        self.dispatch(&mut Event::new(event_type, target).with_timestamp(timestamp));
    }

    pub fn listener_count(&self, target: ElementId, event_type: EventType) -> usize {
        self.state
            .borrow()
            .by_target
            .get(&(target, event_type))
            .map_or(0, Vec::len)
    }
}
