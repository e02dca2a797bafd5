//! Element (node) and recipe types

use serde::{Deserialize, Serialize};

use crate::tier::parse_tier;

/// Names of the seed elements every search starts from
pub const BASIC_ELEMENTS: [&str; 4] = ["Air", "Water", "Fire", "Earth"];

/// Whether a name is one of the seed elements (case-insensitive)
pub fn is_basic_name(name: &str) -> bool {
    BASIC_ELEMENTS
        .iter()
        .any(|basic| basic.eq_ignore_ascii_case(name))
}

/// The seed elements as owned names, in canonical order
pub fn default_start_elements() -> Vec<String> {
    BASIC_ELEMENTS.iter().map(|s| s.to_string()).collect()
}

/// An unordered pair of ingredients that produces some element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "element1")]
    pub first: String,

    #[serde(rename = "element2")]
    pub second: String,
}

impl Recipe {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Order-insensitive match against an ingredient pair
    pub fn matches(&self, a: &str, b: &str) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }

    /// Ingredients ordered lexicographically
    pub fn normalized(&self) -> (&str, &str) {
        normalize_pair(&self.first, &self.second)
    }

    /// Attach the element this recipe produces
    pub fn producing(&self, result: impl Into<String>) -> RecipeStep {
        RecipeStep {
            first: self.first.clone(),
            second: self.second.clone(),
            result: result.into(),
        }
    }
}

/// Order two ingredient names so that pairs compare equal regardless of order
pub fn normalize_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A recipe applied during a search: two ingredients and the element made
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeStep {
    #[serde(rename = "element1")]
    pub first: String,

    #[serde(rename = "element2")]
    pub second: String,

    pub result: String,
}

impl RecipeStep {
    pub fn new(
        first: impl Into<String>,
        second: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
            result: result.into(),
        }
    }

    pub fn ingredients(&self) -> [&str; 2] {
        [&self.first, &self.second]
    }

    /// Identity of the step with ingredient order normalized
    pub fn signature(&self) -> StepSignature {
        let (first, second) = normalize_pair(&self.first, &self.second);
        StepSignature {
            first: first.to_string(),
            second: second.to_string(),
            result: self.result.clone(),
        }
    }

    pub fn recipe(&self) -> Recipe {
        Recipe::new(self.first.clone(), self.second.clone())
    }
}

impl std::fmt::Display for RecipeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} + {} -> {}", self.first, self.second, self.result)
    }
}

/// `(ingredientA, ingredientB) -> result` with ingredients ordered
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepSignature {
    pub first: String,
    pub second: String,
    pub result: String,
}

/// An element in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Element name (also its identity)
    #[serde(default)]
    pub name: String,

    /// True only for the seed elements
    #[serde(default)]
    pub is_basic: bool,

    /// Tier label as published, e.g. "Tier 3 elements"
    #[serde(default)]
    pub tier: String,

    /// Alternative recipes producing this element, in catalog order
    #[serde(default)]
    pub recipes: Vec<Recipe>,

    /// Icon file or URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Element {
    /// Create an element; the basic flag follows the seed-element names
    pub fn new(name: impl Into<String>, tier: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            is_basic: is_basic_name(&name),
            name,
            tier: tier.into(),
            recipes: Vec::new(),
            icon: None,
        }
    }

    pub fn with_recipe(mut self, first: impl Into<String>, second: impl Into<String>) -> Self {
        self.recipes.push(Recipe::new(first, second));
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn basic(mut self, is_basic: bool) -> Self {
        self.is_basic = is_basic;
        self
    }

    pub fn tier_rank(&self) -> u32 {
        parse_tier(&self.tier)
    }

    /// Index of the recipe using this ingredient pair, if any
    pub fn recipe_index(&self, a: &str, b: &str) -> Option<usize> {
        self.recipes.iter().position(|r| r.matches(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_flag_from_name() {
        assert!(Element::new("Water", "Starting elements").is_basic);
        assert!(Element::new("fire", "Starting elements").is_basic);
        assert!(!Element::new("Steam", "Tier 1 elements").is_basic);
    }

    #[test]
    fn test_recipe_matches_either_order() {
        let recipe = Recipe::new("Water", "Fire");
        assert!(recipe.matches("Fire", "Water"));
        assert!(recipe.matches("Water", "Fire"));
        assert!(!recipe.matches("Water", "Water"));
        assert_eq!(recipe.normalized(), ("Fire", "Water"));
    }

    #[test]
    fn test_step_signature_ignores_ingredient_order() {
        let a = RecipeStep::new("Water", "Fire", "Steam");
        let b = RecipeStep::new("Fire", "Water", "Steam");
        assert_eq!(a.signature(), b.signature());
        assert_ne!(a, b);
    }

    #[test]
    fn test_recipe_index_lookup() {
        let mud = Element::new("Mud", "Tier 1 elements")
            .with_recipe("Water", "Earth")
            .with_recipe("Earth", "Rain");
        assert_eq!(mud.recipe_index("Rain", "Earth"), Some(1));
        assert_eq!(mud.recipe_index("Fire", "Earth"), None);
        assert_eq!(mud.tier_rank(), 1);
    }
}
