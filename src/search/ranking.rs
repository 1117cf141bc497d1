//! Relevance tuple shared by fuzzy ordering and the dispatcher
use super::similarity;
use super::Query;
use crate::catalog::Product;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy)]
pub struct Relevance {
    /// Whole normalized query is a substring of the lowercased name.
    pub exact: bool,
    /// Query words (with repetition) found inside the lowercased name.
    pub matched_words: usize,
    pub similarity: f64,
}

impl Relevance {
    pub fn score(query: &Query, name_lower: &str) -> Self {
        Self::with_similarity(query, name_lower, similarity::ratio(&query.normalized, name_lower))
    }

    pub fn with_similarity(query: &Query, name_lower: &str, similarity: f64) -> Self {
        Self {
            exact: name_lower.contains(&query.normalized),
            matched_words: query
                .words
                .iter()
                .filter(|w| name_lower.contains(w.as_str()))
                .count(),
            similarity,
        }
    }

    /// Most relevant first.
    pub fn rank_cmp(&self, other: &Relevance) -> Ordering {
        other
            .exact
            .cmp(&self.exact)
            .then(other.matched_words.cmp(&self.matched_words))
            .then(other.similarity.total_cmp(&self.similarity))
    }
}

/// Stable re-rank of `products` by relevance to `query`; equally relevant
/// products keep their incoming order.
pub fn rank_products(products: &mut Vec<Product>, query: &Query) {
    let mut keyed: Vec<(Relevance, Product)> = products
        .drain(..)
        .map(|p| (Relevance::score(query, &p.name.to_lowercase()), p))
        .collect();
    keyed.sort_by(|a, b| a.0.rank_cmp(&b.0));
    products.extend(keyed.into_iter().map(|(_, p)| p));
}
