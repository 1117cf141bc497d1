//! The text strategies and the price-range strategy
use super::index::{CatalogIndex, ProductIdx};
use super::ranking::Relevance;
use super::similarity;
use super::{Algorithm, Query, SearchResult};
use log::debug;
use memchr::memmem;
use regex::RegexBuilder;
use std::collections::BTreeSet;
use std::time::Instant;

/// Score a fuzzy candidate must exceed to be included.
pub const FUZZY_INCLUDE_THRESHOLD: f64 = 0.6;
/// Containment score at or above which the similarity ratio is skipped.
const EXACT_SHORT_CIRCUIT: f64 = 0.9;
/// Word-overlap score at or above which the similarity ratio is skipped.
const PARTIAL_SHORT_CIRCUIT: f64 = 0.5;

/// Trait for text search strategies
pub trait TextSearch {
    /// Matching products, deduplicated and in the strategy's own order.
    fn find(&self, index: &CatalogIndex, query: &Query) -> Vec<ProductIdx>;
    fn algorithm(&self) -> Algorithm;

    /// Times [`TextSearch::find`] and resolves the matches into a result.
    fn run(&self, index: &CatalogIndex, query: &Query) -> SearchResult {
        let start = Instant::now();
        let matches = if query.is_blank() {
            Vec::new()
        } else {
            self.find(index, query)
        };
        let products: Vec<_> = matches.iter().map(|&i| index.product(i).clone()).collect();
        SearchResult {
            matches_found: products.len(),
            products,
            elapsed: start.elapsed(),
            algorithm: self.algorithm(),
        }
    }
}

/// Text strategy factory
pub struct TextSearchFactory;

impl TextSearchFactory {
    /// `None` for [`Algorithm::PriceRange`], which takes bounds rather than text.
    pub fn create(algorithm: Algorithm) -> Option<Box<dyn TextSearch>> {
        match algorithm {
            Algorithm::Linear => Some(Box::new(LinearSearch)),
            Algorithm::Indexed => Some(Box::new(IndexedSearch)),
            Algorithm::Fuzzy => Some(Box::new(FuzzySearch)),
            Algorithm::Regex => Some(Box::new(RegexSearch)),
            Algorithm::PriceRange => None,
        }
    }
}

fn sorted_by_name(
    index: &CatalogIndex,
    matches: impl IntoIterator<Item = ProductIdx>,
) -> Vec<ProductIdx> {
    let mut matches: Vec<ProductIdx> = matches.into_iter().collect();
    matches.sort_by(|&a, &b| {
        let (pa, pb) = (index.product(a), index.product(b));
        pa.name.cmp(&pb.name).then(pa.id.cmp(&pb.id))
    });
    matches
}

/// Substring scan over name, brand, category and description.
pub struct LinearSearch;

impl TextSearch for LinearSearch {
    fn find(&self, index: &CatalogIndex, query: &Query) -> Vec<ProductIdx> {
        let finder = memmem::Finder::new(query.normalized.as_bytes());
        let matches = index.products().iter().enumerate().filter_map(|(i, p)| {
            [&p.name, &p.brand, &p.category, &p.description]
                .iter()
                .any(|field| finder.find(field.to_lowercase().as_bytes()).is_some())
                .then_some(i)
        });
        sorted_by_name(index, matches)
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Linear
    }
}

/// Union of token lookups.
///
/// Name and full-text indices are probed once per query word, while the
/// brand and category indices are probed with the whole query as a single
/// key. A multi-word brand such as "brook bond" therefore only hits the brand
/// index when typed in full; keep the asymmetry, those two indices are exact
/// lookups.
pub struct IndexedSearch;

impl TextSearch for IndexedSearch {
    fn find(&self, index: &CatalogIndex, query: &Query) -> Vec<ProductIdx> {
        let mut matches = BTreeSet::new();

        for word in &query.words {
            if let Some(hits) = index.name_tokens().get(word) {
                matches.extend(hits);
            }
        }
        if let Some(hits) = index.brands().get(&query.normalized) {
            matches.extend(hits);
        }
        if let Some(hits) = index.categories().get(&query.normalized) {
            matches.extend(hits);
        }
        for word in &query.words {
            if let Some(hits) = index.full_text().get(word) {
                matches.extend(hits);
            }
        }

        sorted_by_name(index, matches)
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Indexed
    }
}

/// Approximate name matching, ordered by [`Relevance`].
pub struct FuzzySearch;

impl FuzzySearch {
    /// Final score of one candidate and the similarity ratio if it had to be
    /// computed.
    fn score(query: &Query, name: &str) -> (f64, Option<f64>) {
        let exact = if name.contains(&query.normalized) {
            1.0
        } else if !name.is_empty() && query.normalized.contains(name) {
            0.9
        } else {
            0.0
        };

        let name_words: Vec<&str> = name.split_whitespace().collect();
        let overlapping = query
            .words
            .iter()
            .filter(|w| name_words.iter().any(|nw| nw.contains(w.as_str())))
            .count();
        let partial = overlapping as f64 / query.words.len() as f64;

        let mut fuzzy = None;
        if exact < EXACT_SHORT_CIRCUIT
            && partial < PARTIAL_SHORT_CIRCUIT
            && similarity::length_bound(&query.normalized, name) > FUZZY_INCLUDE_THRESHOLD
        {
            fuzzy = Some(similarity::ratio(&query.normalized, name));
        }

        (exact.max(partial).max(fuzzy.unwrap_or(0.0)), fuzzy)
    }
}

impl TextSearch for FuzzySearch {
    fn find(&self, index: &CatalogIndex, query: &Query) -> Vec<ProductIdx> {
        if query.is_blank() {
            return Vec::new();
        }
        let mut candidates: Vec<(Relevance, ProductIdx)> = Vec::new();

        for (name, idx) in index.fuzzy_corpus() {
            let (score, ratio) = Self::score(query, name);
            if score > FUZZY_INCLUDE_THRESHOLD {
                let ratio = ratio.unwrap_or_else(|| similarity::ratio(&query.normalized, name));
                candidates.push((Relevance::with_similarity(query, name, ratio), *idx));
            }
        }

        candidates.sort_by(|a, b| {
            a.0.rank_cmp(&b.0).then_with(|| {
                let (pa, pb) = (index.product(a.1), index.product(b.1));
                pa.name.cmp(&pb.name).then(pa.id.cmp(&pb.id))
            })
        });
        candidates.into_iter().map(|(_, idx)| idx).collect()
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Fuzzy
    }
}

/// Case-insensitive regular expression over the text fields. A pattern that
/// fails to compile matches nothing.
pub struct RegexSearch;

impl TextSearch for RegexSearch {
    fn find(&self, index: &CatalogIndex, query: &Query) -> Vec<ProductIdx> {
        let pattern = match RegexBuilder::new(&query.raw).case_insensitive(true).build() {
            Ok(pattern) => pattern,
            Err(e) => {
                debug!("Treating invalid pattern {:?} as no match: {}", query.raw, e);
                return Vec::new();
            }
        };

        let matches = index.products().iter().enumerate().filter_map(|(i, p)| {
            [&p.name, &p.brand, &p.category, &p.description]
                .iter()
                .any(|field| pattern.is_match(field))
                .then_some(i)
        });
        sorted_by_name(index, matches)
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Regex
    }
}

/// Inclusive price bounds answered from the sorted price index.
#[derive(Debug, Clone, Copy)]
pub struct PriceRangeSearch {
    pub min_price: f64,
    pub max_price: f64,
}

impl PriceRangeSearch {
    pub fn new(min_price: f64, max_price: f64) -> Self {
        Self {
            min_price,
            max_price,
        }
    }

    /// Two binary searches, then the slice between them: O(log n + k).
    pub fn find(&self, index: &CatalogIndex) -> Vec<ProductIdx> {
        if self.min_price.is_nan() || self.max_price.is_nan() || self.min_price > self.max_price {
            return Vec::new();
        }
        let prices = index.prices();
        let start = prices.partition_point(|e| e.price < self.min_price);
        let end = prices.partition_point(|e| e.price <= self.max_price);

        prices[start..end]
            .iter()
            .filter_map(|entry| index.position_of(entry.id))
            .collect()
    }

    pub fn run(&self, index: &CatalogIndex) -> SearchResult {
        let start = Instant::now();
        let products: Vec<_> = self
            .find(index)
            .into_iter()
            .map(|i| index.product(i).clone())
            .collect();
        SearchResult {
            matches_found: products.len(),
            products,
            elapsed: start.elapsed(),
            algorithm: Algorithm::PriceRange,
        }
    }
}
