//! Elemental Catalog - sources for the element database
//!
//! This crate loads the persisted element/recipe table into the read-only
//! [`ElementsDatabase`](elemental_core::ElementsDatabase) the search core
//! queries.

pub mod error;
pub mod json;
pub mod memory;
pub mod suggest;
pub mod traits;

pub use error::{CatalogError, CatalogResult};
pub use json::{parse_catalog, JsonFileCatalog, ScrapedElement};
pub use memory::MemoryCatalog;
pub use suggest::{find_similar, suggest_names};
pub use traits::CatalogSource;
