//! Trailing-edge throttling
//!
//! Collapses a burst of calls into one invocation that fires once the calls
//! have stopped for `delay`, carrying the arguments of the last call.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use tracing::trace;
use whiteboard_platform::Host;

/// Delay used when none is configured
pub const DEFAULT_THROTTLE_DELAY: Duration = Duration::from_millis(150);

struct ThrottleState<A> {
    host: Rc<dyn Host>,
    delay: Duration,
    pending: Cell<Option<u64>>,
    callback: RefCell<Box<dyn FnMut(A)>>,
}

/// Rate-limited callback
pub struct Throttle<A> {
    state: Rc<ThrottleState<A>>,
}

impl<A> Clone for Throttle<A> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<A: 'static> Throttle<A> {
    pub fn new<F>(host: Rc<dyn Host>, delay: Duration, callback: F) -> Self
    where
        F: FnMut(A) + 'static,
    {
        Self {
            state: Rc::new(ThrottleState {
                host,
                delay,
                pending: Cell::new(None),
                callback: RefCell::new(Box::new(callback)),
            }),
        }
    }

    /// Restart the delay; the callback later receives `args`
    pub fn call(&self, args: A) {
        let state = &self.state;
        if let Some(id) = state.pending.take() {
            state.host.clear_timeout(id);
        }

        let fire = Rc::clone(state);
        let id = state.host.set_timeout(
            state.delay,
            Box::new(move || {
                fire.pending.set(None);
                trace!("throttled callback fired");
                if let Ok(mut callback) = fire.callback.try_borrow_mut() {
                    (&mut *callback)(args);
                }
            }),
        );
        state.pending.set(Some(id));
    }

    /// Drop a pending invocation
    pub fn cancel(&self) {
        if let Some(id) = self.state.pending.take() {
            self.state.host.clear_timeout(id);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state.pending.get().is_some()
    }

    pub fn delay(&self) -> Duration {
        self.state.delay
    }
}
