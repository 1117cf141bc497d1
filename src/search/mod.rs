//! Multi-strategy product search: indices, strategies, ranking and dispatch
pub mod algorithms;
pub mod cache;
pub mod engine;
pub mod index;
pub mod ranking;
pub mod similarity;
pub mod suggest;

use crate::catalog::Product;
use crate::error::CatalogError;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub use engine::Engine;

/// The five strategies an engine can run. Ordering follows declaration and
/// is the order results are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Algorithm {
    Linear,
    Indexed,
    Fuzzy,
    Regex,
    PriceRange,
}

impl Algorithm {
    pub const TEXT: [Algorithm; 4] = [
        Algorithm::Linear,
        Algorithm::Indexed,
        Algorithm::Fuzzy,
        Algorithm::Regex,
    ];

    /// Stable lowercase identifier used as the dispatcher's result key.
    pub fn id(&self) -> &'static str {
        match self {
            Algorithm::Linear => "linear",
            Algorithm::Indexed => "indexed",
            Algorithm::Fuzzy => "fuzzy",
            Algorithm::Regex => "regex",
            Algorithm::PriceRange => "price_range",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Algorithm::Linear => "Linear Search",
            Algorithm::Indexed => "Indexed Search",
            Algorithm::Fuzzy => "Fuzzy Search",
            Algorithm::Regex => "Regex Search",
            Algorithm::PriceRange => "Price Range Search",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Algorithm {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Algorithm::Linear),
            "indexed" => Ok(Algorithm::Indexed),
            "fuzzy" => Ok(Algorithm::Fuzzy),
            "regex" => Ok(Algorithm::Regex),
            "price_range" => Ok(Algorithm::PriceRange),
            other => Err(CatalogError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Output of one strategy run.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub products: Vec<Product>,
    pub elapsed: Duration,
    pub algorithm: Algorithm,
    /// Number of distinct products matched.
    pub matches_found: usize,
}

impl SearchResult {
    pub fn empty(algorithm: Algorithm, elapsed: Duration) -> Self {
        Self {
            products: Vec::new(),
            elapsed,
            algorithm,
            matches_found: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches_found == 0
    }
}

/// A free-text query in the forms the strategies consume.
#[derive(Debug, Clone)]
pub struct Query {
    /// Trimmed, original case. Regex patterns are compiled from this.
    pub raw: String,
    /// Trimmed and lowercased.
    pub normalized: String,
    /// Whitespace-separated words of `normalized`.
    pub words: Vec<String>,
}

impl Query {
    pub fn new(query: &str) -> Self {
        let raw = query.trim().to_string();
        let normalized = raw.to_lowercase();
        let words = normalized.split_whitespace().map(str::to_string).collect();
        Self {
            raw,
            normalized,
            words,
        }
    }

    /// Empty and whitespace-only queries match nothing in every strategy.
    pub fn is_blank(&self) -> bool {
        self.normalized.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_ids_roundtrip() {
        for algorithm in Algorithm::TEXT.into_iter().chain([Algorithm::PriceRange]) {
            assert_eq!(algorithm.id().parse::<Algorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn test_unknown_algorithm() {
        let err = "binary".parse::<Algorithm>().unwrap_err();
        assert!(matches!(err, CatalogError::UnknownAlgorithm(ref s) if s == "binary"));
        assert!("Linear".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_query_forms() {
        let q = Query::new("  Apple  iPhone ");
        assert_eq!(q.raw, "Apple  iPhone");
        assert_eq!(q.normalized, "apple  iphone");
        assert_eq!(q.words, vec!["apple", "iphone"]);
        assert!(Query::new(" \t ").is_blank());
    }
}
