//! Autocomplete over product names, brands and categories
use super::index::CatalogIndex;
use super::similarity;
use std::collections::BTreeSet;

pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;
/// Minimum similarity for a name to be offered as an approximate completion.
pub const SUGGESTION_CUTOFF: f64 = 0.6;

/// Where a suggestion stands relative to the query; lower ranks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchKind {
    Prefix,
    Contains,
    Fuzzy,
}

impl MatchKind {
    pub fn classify(suggestion: &str, query: &str) -> Self {
        if suggestion.starts_with(query) {
            MatchKind::Prefix
        } else if suggestion.contains(query) {
            MatchKind::Contains
        } else {
            MatchKind::Fuzzy
        }
    }
}

/// Uncached suggestion computation. All returned strings are lowercase.
pub fn compute_suggestions(
    index: &CatalogIndex,
    query: &str,
    max_suggestions: usize,
) -> Vec<String> {
    let query = query.trim().to_lowercase();
    if query.is_empty() || max_suggestions == 0 {
        return Vec::new();
    }

    let mut suggestions: BTreeSet<String> = BTreeSet::new();
    for (name, _) in index.fuzzy_corpus() {
        if name.contains(&query) {
            suggestions.insert(name.clone());
        }
    }
    for key in index.brands().keys().chain(index.categories().keys()) {
        if key.contains(&query) {
            suggestions.insert(key.clone());
        }
    }

    if suggestions.len() < max_suggestions {
        let wanted = max_suggestions - suggestions.len();
        let names = index.fuzzy_corpus().iter().map(|(name, _)| name.as_str());
        suggestions.extend(close_matches(&query, names, wanted, SUGGESTION_CUTOFF));
    }

    let mut ranked: Vec<String> = suggestions.into_iter().collect();
    ranked.sort_by_cached_key(|s| (MatchKind::classify(s, &query), s.chars().count(), s.clone()));
    ranked.truncate(max_suggestions);
    ranked
}

/// Up to `n` distinct candidates whose similarity to `query` is at least
/// `cutoff`, best first; equal scores prefer the lexically greater string.
pub fn close_matches<'a>(
    query: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    n: usize,
    cutoff: f64,
) -> Vec<String> {
    let distinct: BTreeSet<&str> = candidates.into_iter().collect();
    let mut scored: Vec<(f64, &str)> = distinct
        .into_iter()
        .filter(|c| similarity::length_bound(query, c) >= cutoff)
        .map(|c| (similarity::ratio(query, c), c))
        .filter(|(score, _)| *score >= cutoff)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| b.1.cmp(a.1)));
    scored.truncate(n);
    scored.into_iter().map(|(_, c)| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn sample_index() -> CatalogIndex {
        CatalogIndex::build(Catalog::sample().products().to_vec())
    }

    #[test]
    fn test_prefix_before_contains_then_shorter() {
        let index = sample_index();
        let suggestions = compute_suggestions(&index, "apple", 5);
        assert_eq!(
            suggestions,
            vec![
                "apple",
                "apple airpods pro",
                "apple iphone 14 pro",
                "apple macbook air m2",
                "apple macbook pro m3",
            ]
        );
    }

    #[test]
    fn test_brand_and_category_keys_are_offered() {
        let index = sample_index();
        let suggestions = compute_suggestions(&index, "LAPTOP", 5);
        assert_eq!(suggestions[0], "laptops");
    }

    #[test]
    fn test_contains_match_ranks_after_prefix() {
        let index = sample_index();
        let suggestions = compute_suggestions(&index, "galaxy", 5);
        assert_eq!(
            suggestions,
            vec!["samsung galaxy tab s8", "samsung galaxy s23 ultra"]
        );
    }

    #[test]
    fn test_fuzzy_supplement_for_typos() {
        let index = sample_index();
        let suggestions = compute_suggestions(&index, "dep work", 5);
        assert_eq!(suggestions, vec!["deep work"]);
    }

    #[test]
    fn test_degenerate_inputs() {
        let index = sample_index();
        assert!(compute_suggestions(&index, "", 5).is_empty());
        assert!(compute_suggestions(&index, "   ", 5).is_empty());
        assert!(compute_suggestions(&index, "apple", 0).is_empty());
        assert!(compute_suggestions(&CatalogIndex::build(vec![]), "apple", 5).is_empty());
    }

    #[test]
    fn test_close_matches_orders_and_limits() {
        let found = close_matches("dell", ["deal", "dell", "bell", "zzzz"], 2, 0.6);
        assert_eq!(found, vec!["dell", "deal"]);
    }

    #[test]
    fn test_match_kind_order() {
        assert_eq!(MatchKind::classify("apple", "app"), MatchKind::Prefix);
        assert_eq!(MatchKind::classify("pineapple", "app"), MatchKind::Contains);
        assert_eq!(MatchKind::classify("aple", "app"), MatchKind::Fuzzy);
        assert!(MatchKind::Prefix < MatchKind::Contains);
    }
}
