//! Whiteboard error types

use thiserror::Error;

/// Errors surfaced by the [`Whiteboard`](crate::Whiteboard) facade
#[derive(Error, Debug)]
pub enum WhiteboardError {
    /// Animation could not start
    #[error(transparent)]
    Animation(#[from] whiteboard_animation::AnimationError),

    /// Data-attribute options could not be read
    #[error(transparent)]
    Core(#[from] whiteboard_core::CoreError),

    /// Configuration file could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type for whiteboard operations
pub type Result<T> = std::result::Result<T, WhiteboardError>;
