//! Per-frame tick loops
//!
//! A [`TickLoop`] invokes a callback once per frame until stopped. Every
//! tick requests the next frame before running the callback, so a callback
//! that wants to stop cancels the frame that is already pending.

use crate::clock::{FrameClock, FrameHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, trace};
use whiteboard_platform::Host;

/// Viewport snapshot handed to each tick
pub struct TickContext<'a> {
    /// Window scroll offset
    pub scroll: f64,
    pub window_width: f64,
    pub window_height: f64,
    handle: &'a TickHandle,
}

impl TickContext<'_> {
    /// Stop the loop that is running this tick
    pub fn stop(&self) {
        self.handle.cancel();
    }

    /// Handle of the running loop
    pub fn handle(&self) -> &TickHandle {
        self.handle
    }
}

struct LoopState {
    clock: FrameClock,
    pending: Cell<Option<FrameHandle>>,
    running: Cell<bool>,
    ticks: Cell<u64>,
}

/// Handle to a running tick loop
#[derive(Clone)]
pub struct TickHandle {
    state: Rc<LoopState>,
}

impl TickHandle {
    /// Stop the loop and drop its pending frame. Idempotent.
    pub fn cancel(&self) {
        if !self.state.running.replace(false) {
            return;
        }
        if let Some(pending) = self.state.pending.take() {
            self.state.clock.cancel(pending);
        }
        debug!(ticks = self.state.ticks.get(), "tick loop stopped");
    }

    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }

    /// Number of ticks delivered so far
    pub fn ticks(&self) -> u64 {
        self.state.ticks.get()
    }
}

type TickCallback = Rc<RefCell<dyn FnMut(&TickContext<'_>)>>;

/// Starts per-frame loops on a frame clock
#[derive(Clone)]
pub struct TickLoop {
    clock: FrameClock,
}

impl TickLoop {
    pub fn new(clock: FrameClock) -> Self {
        Self { clock }
    }

    /// Run `callback` every frame until the returned handle is cancelled.
    ///
    /// The first tick runs before `run` returns.
    pub fn run<F>(&self, callback: F) -> TickHandle
    where
        F: FnMut(&TickContext<'_>) + 'static,
    {
        let handle = TickHandle {
            state: Rc::new(LoopState {
                clock: self.clock.clone(),
                pending: Cell::new(None),
                running: Cell::new(true),
                ticks: Cell::new(0),
            }),
        };
        let callback: TickCallback = Rc::new(RefCell::new(callback));

        debug!(mode = ?self.clock.mode(), "tick loop started");
        tick(&handle, &callback);
        handle
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn host(&self) -> &Rc<dyn Host> {
        self.clock.host()
    }
}

fn tick(handle: &TickHandle, callback: &TickCallback) {
    if !handle.is_running() {
        return;
    }

    let state = &handle.state;
    let next_handle = handle.clone();
    let next_callback = Rc::clone(callback);
    let pending = state
        .clock
        .schedule(Box::new(move || tick(&next_handle, &next_callback)));
    state.pending.set(Some(pending));
    state.ticks.set(state.ticks.get() + 1);

    let host = state.clock.host();
    let viewport = host.viewport_size();
    let ctx = TickContext {
        scroll: host.window_scroll_top(),
        window_width: viewport.width,
        window_height: viewport.height,
        handle,
    };
    trace!(tick = state.ticks.get(), scroll = ctx.scroll, "tick");

    // A loop never re-enters its own callback; frames fire one at a time
    if let Ok(mut callback) = callback.try_borrow_mut() {
        (&mut *callback)(&ctx);
    }
}
