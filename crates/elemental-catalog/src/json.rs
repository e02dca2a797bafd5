//! JSON catalog files
//!
//! Two layouts are accepted:
//!
//! - the scraped layout, keyed by element name:
//!   `{ "Steam": { "combos": [["Water", "Fire"]], "image": "steam.png", "tier": "Tier 1 elements" } }`
//! - the normalized layout:
//!   `{ "elements": { "Steam": { "name": "Steam", "isBasic": false, "recipes": [{ "element1": "Water", "element2": "Fire" }], "tier": "Tier 1 elements" } } }`

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use elemental_core::{is_basic_name, Element, ElementsDatabase, Recipe};
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};
use crate::traits::CatalogSource;

/// One entry of a scraped catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapedElement {
    #[serde(default)]
    pub combos: Vec<[String; 2]>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub tier: String,
}

impl ScrapedElement {
    /// Convert into a catalog element named `name`
    pub fn into_element(self, name: &str) -> Element {
        Element {
            name: name.to_string(),
            is_basic: is_basic_name(name),
            tier: self.tier,
            recipes: self
                .combos
                .into_iter()
                .map(|[first, second]| Recipe::new(first, second))
                .collect(),
            icon: self.image.filter(|i| !i.is_empty()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Normalized { elements: HashMap<String, Element> },
    Scraped(HashMap<String, ScrapedElement>),
}

/// Parse catalog JSON text into the element database
pub fn parse_catalog(json: &str) -> CatalogResult<ElementsDatabase> {
    let file: CatalogFile = serde_json::from_str(json)?;

    let elements: Vec<Element> = match file {
        CatalogFile::Normalized { elements } => elements
            .into_iter()
            .map(|(key, mut element)| {
                if element.name.is_empty() {
                    element.name = key;
                } else if element.name != key {
                    tracing::debug!("Catalog key '{}' names element '{}'", key, element.name);
                }
                element
            })
            .collect(),
        CatalogFile::Scraped(raw) => raw
            .into_iter()
            .map(|(name, scraped)| scraped.into_element(&name))
            .collect(),
    };

    if let Some(bad) = elements.iter().find(|e| e.name.trim().is_empty()) {
        return Err(CatalogError::InvalidEntry(format!(
            "element with empty name (tier '{}')",
            bad.tier
        )));
    }

    let db = ElementsDatabase::new(elements);
    if db.is_empty() {
        return Err(CatalogError::Empty("no elements".to_string()));
    }
    if db.skipped_recipes() > 0 {
        tracing::warn!(
            "{} recipes reference unknown ingredients and will never be used",
            db.skipped_recipes()
        );
    }
    tracing::debug!("Loaded catalog with {} elements", db.len());
    Ok(db)
}

/// Catalog stored as a JSON file on disk
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalog {
    async fn load(&self) -> CatalogResult<ElementsDatabase> {
        tracing::debug!("Reading catalog from {:?}", self.path);
        let text = tokio::fs::read_to_string(&self.path).await?;
        parse_catalog(&text)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRAPED: &str = r#"{
        "Air": { "combos": [], "image": "air.svg", "tier": "Starting elements" },
        "Water": { "combos": [], "image": "", "tier": "Starting elements" },
        "Fire": { "combos": [], "tier": "Starting elements" },
        "Earth": { "combos": [], "tier": "Starting elements" },
        "Steam": { "combos": [["Water", "Fire"], ["Air", "Lava"]], "tier": "Tier 1 elements" }
    }"#;

    #[test]
    fn test_parse_scraped_layout() {
        let db = parse_catalog(SCRAPED).unwrap();
        assert_eq!(db.len(), 5);

        let water = db.get("Water").unwrap();
        assert!(water.is_basic);
        assert!(water.icon.is_none());
        assert_eq!(db.get("Air").unwrap().icon.as_deref(), Some("air.svg"));

        let steam = db.get("Steam").unwrap();
        assert!(!steam.is_basic);
        assert_eq!(steam.tier_rank(), 1);
        assert_eq!(steam.recipes.len(), 2);
        assert_eq!(db.skipped_recipes(), 1);
    }

    #[test]
    fn test_parse_normalized_layout() {
        let json = r#"{ "elements": {
            "Water": { "name": "Water", "isBasic": true, "tier": "Starting elements" },
            "Fire": { "isBasic": true, "tier": "Starting elements" },
            "Steam": { "name": "Steam", "recipes": [{ "element1": "Water", "element2": "Fire" }], "tier": "Tier 1 elements" }
        } }"#;
        let db = parse_catalog(json).unwrap();
        assert_eq!(db.len(), 3);
        assert!(db.get("Fire").unwrap().is_basic);
        assert_eq!(db.results_of("Fire", "Water"), vec!["Steam"]);
    }

    #[test]
    fn test_empty_catalog_is_an_error() {
        assert!(matches!(parse_catalog("{}"), Err(CatalogError::Empty(_))));
        assert!(matches!(parse_catalog("[1, 2]"), Err(CatalogError::Parse(_))));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("elements.json");
        std::fs::write(&path, SCRAPED).unwrap();

        let source = JsonFileCatalog::new(&path);
        let db = source.load().await.unwrap();
        assert!(db.contains("Steam"));
        assert!(source.describe().ends_with("elements.json"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let source = JsonFileCatalog::new("/nonexistent/elements.json");
        assert!(matches!(source.load().await, Err(CatalogError::Io(_))));
    }
}
