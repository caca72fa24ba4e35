//! Animation error types

use thiserror::Error;

/// Animation configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// The easing name is neither built in nor registered in the table
    #[error("Unknown easing: {0}")]
    UnknownEasing(String),
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
