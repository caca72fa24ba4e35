//! Whiteboard Platform Abstraction
//!
//! The traits a host environment implements so the frame loop, animator,
//! viewport watcher and scroller can run without ambient globals:
//!
//! - [`FrameHost`]: display-aligned frame callbacks (`requestAnimationFrame`)
//! - [`TimerHost`]: one-shot timeouts and a monotonic clock
//! - [`Document`]: viewport, element geometry, scroll containers, URL fragment
//!
//! [`HeadlessHost`] implements all of them in memory with virtual time.

pub mod geometry;
pub mod headless;
pub mod host;

pub use geometry::{ElementId, Rect, ViewportSize};
pub use headless::{ElementSpec, HeadlessHost};
pub use host::{Document, FrameCallback, FrameHost, Host, TimerHost};
