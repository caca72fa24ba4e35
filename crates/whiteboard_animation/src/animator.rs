//! Time-bounded value animation
//!
//! An animation moves `value` from `from` to `to` over `duration`
//! milliseconds, one frame interval per tick. The delay is applied by
//! starting the elapsed time at `-delay`.
//!
//! A duration that is not positive (zero, negative or NaN) finishes on the
//! first tick at `to`, whatever the delay.
//!
//! ```rust
//! use std::rc::Rc;
//! use whiteboard_animation::{AnimationCallbacks, AnimationOptions, Animator, EasingTable};
//! use whiteboard_core::{FrameClock, TickLoop};
//! use whiteboard_platform::{HeadlessHost, Host, ViewportSize};
//!
//! let host = Rc::new(HeadlessHost::new(ViewportSize::new(800.0, 600.0)));
//! let ticks = TickLoop::new(FrameClock::new(host.clone() as Rc<dyn Host>));
//! let animator = Animator::new(ticks, EasingTable::standard().shared());
//!
//! let handle = animator
//!     .animate(
//!         AnimationOptions::new(0.0, 100.0).with_duration(500.0),
//!         AnimationCallbacks::new().on_change(|state| println!("{}", state.value)),
//!     )
//!     .unwrap();
//!
//! host.run_frames(40);
//! assert!(handle.is_done());
//! assert_eq!(handle.value(), 100.0);
//! ```

use crate::easing::{is_builtin_linear, EasingFn, SharedEasingTable};
use crate::error::{AnimationError, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, error};
use whiteboard_core::{TickContext, TickHandle, TickLoop};

/// What to animate. Times are in milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationOptions {
    pub from: f64,
    pub to: f64,
    pub delay: f64,
    pub duration: f64,
    pub easing: String,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            from: 0.0,
            to: 1.0,
            delay: 0.0,
            duration: 1000.0,
            easing: "linear".to_string(),
        }
    }
}

impl AnimationOptions {
    pub fn new(from: f64, to: f64) -> Self {
        Self {
            from,
            to,
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_easing(mut self, easing: impl Into<String>) -> Self {
        self.easing = easing.into();
        self
    }
}

/// Snapshot of a running animation, passed to callbacks
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationState {
    /// Time since the delay ended; negative while delayed, never above `duration`
    pub elapsed: f64,
    pub from: f64,
    pub to: f64,
    pub value: f64,
    pub delay: f64,
    pub duration: f64,
    pub easing: String,
    pub done: bool,
}

impl AnimationState {
    fn new(options: &AnimationOptions) -> Self {
        Self {
            elapsed: -options.delay,
            from: options.from,
            to: options.to,
            value: options.from,
            delay: options.delay,
            duration: options.duration,
            easing: options.easing.clone(),
            done: false,
        }
    }

    /// `elapsed / duration`; 1 for non-positive durations
    pub fn progress(&self) -> f64 {
        if self.is_instant() {
            1.0
        } else {
            self.elapsed / self.duration
        }
    }

    /// Zero, negative and NaN durations complete immediately
    fn is_instant(&self) -> bool {
        self.duration.is_nan() || self.duration <= 0.0
    }

    fn interpolate(&self, easing: Option<&EasingFn>) -> f64 {
        let range = self.to - self.from;
        if self.is_instant() {
            return self.to;
        }
        match easing {
            Some(function) => function(self.elapsed.max(0.0), self.from, range, self.duration),
            None => self.from + range * self.elapsed / self.duration,
        }
    }
}

/// Called on every tick
pub type ChangeCallback = Box<dyn FnMut(&AnimationState)>;

/// Called once, after the last `on_change`
pub type FinishCallback = Box<dyn FnOnce(&AnimationState)>;

/// Optional change and finish callbacks
#[derive(Default)]
pub struct AnimationCallbacks {
    pub(crate) on_change: Option<ChangeCallback>,
    pub(crate) on_finish: Option<FinishCallback>,
}

impl AnimationCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change<F: FnMut(&AnimationState) + 'static>(mut self, callback: F) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn on_finish<F: FnOnce(&AnimationState) + 'static>(mut self, callback: F) -> Self {
        self.on_finish = Some(Box::new(callback));
        self
    }
}

/// Handle to a started animation
#[derive(Clone)]
pub struct AnimationHandle {
    tick: TickHandle,
    state: Rc<RefCell<AnimationState>>,
}

impl fmt::Debug for AnimationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationHandle")
            .field("running", &self.is_running())
            .field("state", &*self.state.borrow())
            .finish()
    }
}

impl AnimationHandle {
    /// Stop the animation where it is; `on_finish` will not run
    pub fn cancel(&self) {
        self.tick.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.tick.is_running()
    }

    pub fn is_done(&self) -> bool {
        self.state.borrow().done
    }

    pub fn value(&self) -> f64 {
        self.state.borrow().value
    }

    pub fn state(&self) -> AnimationState {
        self.state.borrow().clone()
    }
}

/// Starts animations on a tick loop
#[derive(Clone)]
pub struct Animator {
    ticks: TickLoop,
    easings: SharedEasingTable,
}

impl Animator {
    pub fn new(ticks: TickLoop, easings: SharedEasingTable) -> Self {
        Self { ticks, easings }
    }

    /// Start an animation. The first tick runs immediately.
    ///
    /// Fails with [`AnimationError::UnknownEasing`] when the easing is not
    /// `linear`/`swing` and missing from the table; the loop is stopped and
    /// no callback runs.
    pub fn animate(
        &self,
        options: AnimationOptions,
        callbacks: AnimationCallbacks,
    ) -> Result<AnimationHandle> {
        let frame_ms = self.ticks.clock().frame_interval_ms();
        let state = Rc::new(RefCell::new(AnimationState::new(&options)));
        let failure: Rc<RefCell<Option<AnimationError>>> = Rc::default();

        debug!(
            from = options.from,
            to = options.to,
            duration = options.duration,
            delay = options.delay,
            easing = %options.easing,
            "animation started"
        );

        let mut driver = Driver {
            state: Rc::clone(&state),
            easings: Rc::clone(&self.easings),
            failure: Rc::clone(&failure),
            callbacks,
            frame_ms,
        };
        let tick = self.ticks.run(move |ctx| driver.tick(ctx));

        if let Some(err) = failure.borrow_mut().take() {
            return Err(err);
        }

        Ok(AnimationHandle { tick, state })
    }

    pub fn ticks(&self) -> &TickLoop {
        &self.ticks
    }

    pub fn easings(&self) -> &SharedEasingTable {
        &self.easings
    }
}

struct Driver {
    state: Rc<RefCell<AnimationState>>,
    easings: SharedEasingTable,
    failure: Rc<RefCell<Option<AnimationError>>>,
    callbacks: AnimationCallbacks,
    frame_ms: f64,
}

impl Driver {
    fn tick(&mut self, ctx: &TickContext<'_>) {
        let easing = match self.resolve_easing() {
            Ok(easing) => easing,
            Err(err) => {
                error!(%err, "animation stopped");
                ctx.stop();
                *self.failure.borrow_mut() = Some(err);
                return;
            }
        };

        let snapshot = {
            let mut state = self.state.borrow_mut();
            if state.is_instant() {
                state.elapsed = 0.0;
            } else {
                state.elapsed = (state.elapsed + self.frame_ms).min(state.duration);
            }
            state.value = state.interpolate(easing.as_ref());

            let finished = state.is_instant() || state.elapsed >= state.duration;
            if finished && !state.done {
                ctx.stop();
                state.done = true;
            }
            state.clone()
        };

        if let Some(on_change) = self.callbacks.on_change.as_mut() {
            on_change(&snapshot);
        }

        if snapshot.done {
            debug!(value = snapshot.value, "animation finished");
            if let Some(on_finish) = self.callbacks.on_finish.take() {
                on_finish(&snapshot);
            }
        }
    }

    fn resolve_easing(&self) -> Result<Option<EasingFn>> {
        let name = self.state.borrow().easing.clone();
        if is_builtin_linear(&name) {
            return Ok(None);
        }
        self.easings.borrow().resolve(&name).map(Some)
    }
}
