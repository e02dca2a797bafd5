//! Fuzzy element-name lookup using nucleo

use elemental_core::{Element, ElementsDatabase};
use nucleo_matcher::{
    pattern::{AtomKind, CaseMatching, Normalization, Pattern},
    Config, Matcher,
};

/// Elements whose names fuzzily match `query`, best match first
pub fn find_similar<'a>(db: &'a ElementsDatabase, query: &str, limit: usize) -> Vec<&'a Element> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let pattern = Pattern::new(
        query,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Fuzzy,
    );
    let mut matcher = Matcher::new(Config::DEFAULT);
    let mut buf = Vec::new();

    let mut scored: Vec<(&Element, u32)> = db
        .iter()
        .filter_map(|element| {
            pattern
                .score(
                    nucleo_matcher::Utf32Str::new(&element.name, &mut buf),
                    &mut matcher,
                )
                .map(|score| (element, score))
        })
        .collect();

    // Sort by score descending, shorter names first on ties
    scored.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| a.0.name.len().cmp(&b.0.name.len()))
            .then_with(|| a.0.name.cmp(&b.0.name))
    });

    scored.into_iter().take(limit).map(|(e, _)| e).collect()
}

/// Names to offer when a requested element does not exist
pub fn suggest_names(db: &ElementsDatabase, query: &str, limit: usize) -> Vec<String> {
    find_similar(db, query, limit)
        .into_iter()
        .map(|e| e.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ElementsDatabase {
        ElementsDatabase::new(vec![
            Element::new("Steam", "Tier 1 elements"),
            Element::new("Stone", "Tier 2 elements"),
            Element::new("Water", "Starting elements"),
            Element::new("Steel", "Tier 4 elements"),
        ])
    }

    #[test]
    fn test_exact_name_ranks_first() {
        let db = catalog();
        let names = suggest_names(&db, "steam", 3);
        assert_eq!(names.first().map(String::as_str), Some("Steam"));
    }

    #[test]
    fn test_partial_query() {
        let db = catalog();
        let names = suggest_names(&db, "ste", 10);
        assert!(names.contains(&"Steam".to_string()));
        assert!(names.contains(&"Steel".to_string()));
        assert!(!names.contains(&"Water".to_string()));
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let db = catalog();
        assert!(suggest_names(&db, "  ", 5).is_empty());
    }
}
