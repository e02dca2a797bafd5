//! Error types for Elemental Core

use thiserror::Error;

use crate::limits::ValidationError;

/// Result type alias using Elemental's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Elemental error types
///
/// Search outcomes (unknown target, trivial target, timeouts, repair gaps)
/// are data on the returned report, never variants here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
