//! Frame clock
//!
//! Single-shot frame scheduling over the host. Uses native animation
//! frames when the host has them, otherwise a fixed-interval timeout.

use std::rc::Rc;
use std::time::Duration;
use tracing::debug;
use whiteboard_platform::{FrameCallback, Host};

/// Frames per second assumed by the timer fallback and by animations
pub const DEFAULT_FRAME_RATE: f64 = 60.0;

/// How a clock delivers its frames
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClockMode {
    /// Host-native, display-aligned frames
    AnimationFrame,
    /// Fixed-interval timeouts
    Timer,
}

/// Opaque token for a pending frame callback
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle {
    mode: ClockMode,
    id: u64,
}

/// Schedules one-shot callbacks for the next frame
#[derive(Clone)]
pub struct FrameClock {
    host: Rc<dyn Host>,
    mode: ClockMode,
    frame_rate: f64,
    interval: Duration,
}

impl FrameClock {
    pub fn new(host: Rc<dyn Host>) -> Self {
        Self::with_frame_rate(host, DEFAULT_FRAME_RATE)
    }

    /// Create a clock with a custom frame rate.
    ///
    /// Non-positive or non-finite rates fall back to [`DEFAULT_FRAME_RATE`].
    pub fn with_frame_rate(host: Rc<dyn Host>, frame_rate: f64) -> Self {
        let rate = if frame_rate.is_finite() && frame_rate > 0.0 {
            frame_rate
        } else {
            DEFAULT_FRAME_RATE
        };

        let mode = if host.frames().is_some() {
            ClockMode::AnimationFrame
        } else {
            debug!(frame_rate = rate, "no native frames, using timer fallback");
            ClockMode::Timer
        };

        Self {
            host,
            mode,
            frame_rate: rate,
            interval: Duration::from_secs_f64(1.0 / rate),
        }
    }

    /// Run `callback` once on the next frame
    pub fn schedule(&self, callback: FrameCallback) -> FrameHandle {
        if self.mode == ClockMode::AnimationFrame {
            if let Some(frames) = self.host.frames() {
                return FrameHandle {
                    mode: ClockMode::AnimationFrame,
                    id: frames.request_animation_frame(callback),
                };
            }
        }

        FrameHandle {
            mode: ClockMode::Timer,
            id: self.host.set_timeout(self.interval, callback),
        }
    }

    /// Cancel a pending callback. Fired or already cancelled handles are ignored.
    pub fn cancel(&self, handle: FrameHandle) {
        match handle.mode {
            ClockMode::AnimationFrame => {
                if let Some(frames) = self.host.frames() {
                    frames.cancel_animation_frame(handle.id);
                }
            }
            ClockMode::Timer => self.host.clear_timeout(handle.id),
        }
    }

    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    /// Nominal time between frames
    pub fn frame_interval(&self) -> Duration {
        self.interval
    }

    /// Nominal time between frames in milliseconds
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.frame_rate
    }

    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    pub fn host(&self) -> &Rc<dyn Host> {
        &self.host
    }
}
