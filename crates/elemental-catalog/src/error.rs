//! Catalog error types

use thiserror::Error;

/// Result type alias for catalog operations
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Catalog-specific error types
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog is empty: {0}")]
    Empty(String),

    #[error("Invalid catalog entry: {0}")]
    InvalidEntry(String),
}
