//! Search error types

use elemental_core::ValidationError;
use thiserror::Error;

/// Result type alias for search operations
pub type SearchOutcome<T> = std::result::Result<T, SearchError>;

/// Search-specific error types
///
/// Unknown targets, timeouts and unrepairable paths are reported through
/// [`SearchReport`](crate::SearchReport), not here.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("Worker failed: {0}")]
    Worker(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for SearchError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Worker(err.to_string())
    }
}
