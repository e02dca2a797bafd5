//! In-memory catalog source
//!
//! Useful for tests and for embedding a small catalog directly.

use async_trait::async_trait;
use elemental_core::{Element, ElementsDatabase};

use crate::error::{CatalogError, CatalogResult};
use crate::traits::CatalogSource;

/// Catalog held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    elements: Vec<Element>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Add the four seed elements at the starting tier
    pub fn with_basic_elements(mut self) -> Self {
        for name in elemental_core::BASIC_ELEMENTS {
            self.elements
                .push(Element::new(name, elemental_core::STARTING_TIER_LABEL));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Build the database without going through the async trait
    pub fn build(&self) -> ElementsDatabase {
        ElementsDatabase::new(self.elements.clone())
    }
}

#[async_trait]
impl CatalogSource for MemoryCatalog {
    async fn load(&self) -> CatalogResult<ElementsDatabase> {
        if self.elements.is_empty() {
            return Err(CatalogError::Empty("in-memory catalog".to_string()));
        }
        Ok(self.build())
    }

    fn describe(&self) -> String {
        format!("in-memory catalog ({} elements)", self.elements.len())
    }
}
