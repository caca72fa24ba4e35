//! Whiteboard Animation System
//!
//! Frame-driven animation on top of `whiteboard_core` tick loops.
//!
//! # Features
//!
//! - **Easing**: named easing table with the common curves and cubic beziers
//! - **Animator**: time-bounded `from -> to` interpolation with change/finish callbacks
//! - **Viewport Watcher**: `wb.appear` / `wb.disappear` events on visibility changes
//! - **Scroller**: smooth scrolling to pixels, percentages, `vh` units or elements

pub mod animator;
pub mod easing;
pub mod error;
pub mod scroll;
pub mod stalker;

pub use animator::{
    AnimationCallbacks, AnimationHandle, AnimationOptions, AnimationState, Animator,
};
pub use easing::{Easing, EasingFn, EasingTable, SharedEasingTable};
pub use error::{AnimationError, Result};
pub use scroll::{ScrollOptions, ScrollSpec, ScrollTarget, Scroller};
pub use stalker::ViewportWatcher;
