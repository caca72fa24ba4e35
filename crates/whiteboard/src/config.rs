//! Runtime configuration
//!
//! ```toml
//! frame_rate = 60.0
//! throttle_delay_ms = 150
//! data_prefix = "wb-"
//!
//! [scroll]
//! duration = 800.0
//! easing = "easeInOutCubic"
//! change_hash = true
//! ```
//!
//! Every key is optional.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use whiteboard_animation::ScrollOptions;
use whiteboard_core::{DEFAULT_DATA_PREFIX, DEFAULT_FRAME_RATE, DEFAULT_THROTTLE_DELAY};

/// Settings for a [`Whiteboard`](crate::Whiteboard)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhiteboardConfig {
    /// Frames per second of the timer fallback; also the animation step
    pub frame_rate: f64,
    /// Quiet period before a throttled callback fires
    pub throttle_delay_ms: u64,
    /// Prefix of `data-*` option attributes
    pub data_prefix: String,
    /// Defaults for [`Whiteboard::scroll_options`](crate::Whiteboard::scroll_options)
    pub scroll: ScrollOptions,
}

impl Default for WhiteboardConfig {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            throttle_delay_ms: DEFAULT_THROTTLE_DELAY.as_millis() as u64,
            data_prefix: DEFAULT_DATA_PREFIX.to_string(),
            scroll: ScrollOptions::default(),
        }
    }
}

impl WhiteboardConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn throttle_delay(&self) -> Duration {
        Duration::from_millis(self.throttle_delay_ms)
    }
}
