//! Catalog source trait definitions

use crate::error::CatalogResult;
use async_trait::async_trait;
use elemental_core::ElementsDatabase;

/// Anything that can produce the read-only element database.
///
/// The search core never mutates what a source returns; callers wrap the
/// database in an `Arc` and share it across searches.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load and index the catalog
    async fn load(&self) -> CatalogResult<ElementsDatabase>;

    /// Human-readable origin, used in logs
    fn describe(&self) -> String;
}
