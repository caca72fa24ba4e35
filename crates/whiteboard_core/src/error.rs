//! Core error types

use thiserror::Error;

/// Errors raised by core utilities
#[derive(Error, Debug)]
pub enum CoreError {
    /// Defaults for data-attribute options must be a struct or map
    #[error("Option defaults must serialize to an object, got {0}")]
    DefaultsNotObject(&'static str),

    /// A data attribute could not be converted to the option's type
    #[error("Invalid data attribute options: {0}")]
    Attributes(#[from] serde_json::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
