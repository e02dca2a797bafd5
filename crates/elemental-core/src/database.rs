//! Read-only element catalog with a recipe index for searching

use std::collections::HashMap;

use crate::element::Element;

/// Dense handle for an element inside one [`ElementsDatabase`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One way an ingredient pair can be combined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Producer {
    /// Element produced
    pub result: ElementId,
    /// Index of the recipe within the result's recipe list
    pub recipe_index: usize,
}

/// Mapping from element name to element, plus lookup tables built once.
///
/// Elements are kept in tier order (rank ascending, then name) so every
/// enumeration over the catalog is deterministic.
#[derive(Debug, Clone, Default)]
pub struct ElementsDatabase {
    elements: Vec<Element>,
    ranks: Vec<u32>,
    ids: HashMap<String, ElementId>,
    producers: HashMap<(ElementId, ElementId), Vec<Producer>>,
    skipped_recipes: usize,
}

impl ElementsDatabase {
    /// Build the database. Duplicate names keep the first occurrence;
    /// recipes naming unknown ingredients are dropped from the index.
    pub fn new(elements: impl IntoIterator<Item = Element>) -> Self {
        let mut elements: Vec<Element> = elements.into_iter().collect();
        elements.sort_by(|a, b| {
            a.tier_rank()
                .cmp(&b.tier_rank())
                .then_with(|| a.name.cmp(&b.name))
        });

        let mut ids: HashMap<String, ElementId> = HashMap::with_capacity(elements.len());
        let mut unique = Vec::with_capacity(elements.len());
        for element in elements {
            if ids.contains_key(&element.name) {
                tracing::warn!("Duplicate element '{}' in catalog, keeping first", element.name);
                continue;
            }
            ids.insert(element.name.clone(), ElementId(unique.len() as u32));
            unique.push(element);
        }

        let ranks = unique.iter().map(Element::tier_rank).collect();
        let mut producers: HashMap<(ElementId, ElementId), Vec<Producer>> = HashMap::new();
        let mut skipped_recipes = 0;

        for (index, element) in unique.iter().enumerate() {
            let result = ElementId(index as u32);
            for (recipe_index, recipe) in element.recipes.iter().enumerate() {
                let (Some(&a), Some(&b)) = (ids.get(&recipe.first), ids.get(&recipe.second))
                else {
                    tracing::debug!(
                        "Skipping recipe {} + {} -> {}: unknown ingredient",
                        recipe.first,
                        recipe.second,
                        element.name
                    );
                    skipped_recipes += 1;
                    continue;
                };
                producers
                    .entry(pair_key(a, b))
                    .or_default()
                    .push(Producer {
                        result,
                        recipe_index,
                    });
            }
        }

        Self {
            elements: unique,
            ranks,
            ids,
            producers,
            skipped_recipes,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ids.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Element> {
        self.id(name).map(|id| self.element(id))
    }

    pub fn id(&self, name: &str) -> Option<ElementId> {
        self.ids.get(name).copied()
    }

    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.index()]
    }

    pub fn name(&self, id: ElementId) -> &str {
        &self.elements[id.index()].name
    }

    pub fn rank(&self, id: ElementId) -> u32 {
        self.ranks[id.index()]
    }

    /// Elements in tier order
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// Everything the pair `a + b` can produce, in tier order
    pub fn producers(&self, a: ElementId, b: ElementId) -> &[Producer] {
        self.producers
            .get(&pair_key(a, b))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Names of the elements produced by combining two named elements
    pub fn results_of(&self, a: &str, b: &str) -> Vec<&str> {
        match (self.id(a), self.id(b)) {
            (Some(a), Some(b)) => self
                .producers(a, b)
                .iter()
                .map(|p| self.name(p.result))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Index of the recipe `a + b` within `result`'s recipe list
    pub fn recipe_index(&self, result: &str, a: &str, b: &str) -> Option<usize> {
        self.get(result).and_then(|e| e.recipe_index(a, b))
    }

    /// Number of recipes dropped at build time because an ingredient was missing
    pub fn skipped_recipes(&self) -> usize {
        self.skipped_recipes
    }

    /// Seed elements present in the catalog
    pub fn basic_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| e.is_basic)
    }
}

fn pair_key(a: ElementId, b: ElementId) -> (ElementId, ElementId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
