//! Whiteboard Core Runtime
//!
//! The frame-driven primitives everything else is built on:
//!
//! - **Frame Clock**: one-shot frame callbacks with a timer fallback
//! - **Tick Loops**: per-frame callbacks with viewport snapshots and stop handles
//! - **Event Dispatch**: listeners per element and event type
//! - **Throttling**: trailing-edge rate limiting and resize notification
//! - **Data Attributes**: options objects read from `data-*` attributes
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use whiteboard_core::{FrameClock, TickLoop};
//! use whiteboard_platform::{HeadlessHost, Host, ViewportSize};
//!
//! let host = Rc::new(HeadlessHost::new(ViewportSize::new(800.0, 600.0)));
//! let ticks = TickLoop::new(FrameClock::new(host.clone() as Rc<dyn Host>));
//!
//! let mut frames = 0;
//! let handle = ticks.run(move |ctx| {
//!     frames += 1;
//!     if frames == 3 {
//!         ctx.stop();
//!     }
//! });
//!
//! host.run_frames(5);
//! assert!(!handle.is_running());
//! ```

pub mod attrs;
pub mod clock;
pub mod error;
pub mod events;
pub mod resize;
pub mod throttle;
pub mod tick;

pub use attrs::{options_from_data, DEFAULT_DATA_PREFIX};
pub use clock::{ClockMode, FrameClock, FrameHandle, DEFAULT_FRAME_RATE};
pub use error::{CoreError, Result};
pub use events::{Event, EventData, EventDispatcher, EventType, ListenerId};
pub use resize::ResizeRelay;
pub use throttle::{Throttle, DEFAULT_THROTTLE_DELAY};
pub use tick::{TickContext, TickHandle, TickLoop};
