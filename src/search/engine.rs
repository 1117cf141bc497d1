//! Search engine: owns the indices, runs strategies and dispatches queries
use super::algorithms::{PriceRangeSearch, TextSearchFactory};
use super::cache::{CacheKey, CacheStats, SuggestionCache};
use super::index::CatalogIndex;
use super::ranking::rank_products;
use super::suggest::compute_suggestions;
use super::{Algorithm, Query, SearchResult};
use crate::catalog::{Catalog, Product};
use crate::config::EngineConfig;
use crate::error::{CatalogError, Result};
use crate::metrics::Metrics;
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::Arc;

lazy_static! {
    static ref PRICE_RANGE: Regex =
        Regex::new(r"(?i)^price:(\d+)-(\d+)").expect("price range pattern is valid");
}

/// Parse a leading `price:<min>-<max>` (case-insensitive, no inner
/// whitespace). Text after the upper bound is ignored.
pub fn parse_price_range(query: &str) -> Option<(f64, f64)> {
    let caps = PRICE_RANGE.captures(query.trim())?;
    let min = caps[1].parse().ok()?;
    let max = caps[2].parse().ok()?;
    Some((min, max))
}

/// Results of a dispatched query keyed by strategy. Strategies that matched
/// nothing are absent.
pub type SearchResults = BTreeMap<Algorithm, SearchResult>;

/// Read-only search engine over one catalog snapshot.
///
/// The engine does not observe the catalog it was built from. After adding
/// or removing products the caller must [`Engine::rebuild`] it; until then
/// searches answer from the old snapshot. The suggestion cache is the only
/// interior mutable state and is internally locked, so `&Engine` can be
/// shared between threads.
pub struct Engine {
    index: CatalogIndex,
    suggestions: SuggestionCache,
    config: EngineConfig,
    metrics: Arc<Metrics>,
}

impl Engine {
    pub fn new(products: Vec<Product>) -> Self {
        Self::with_config(products, EngineConfig::default(), Arc::new(Metrics::new()))
    }

    pub fn with_config(
        products: Vec<Product>,
        config: EngineConfig,
        metrics: Arc<Metrics>,
    ) -> Self {
        let index = CatalogIndex::build(products);
        info!("Search engine ready with {} products", index.len());
        Self {
            index,
            suggestions: SuggestionCache::new(config.suggestion_cache_size),
            config,
            metrics,
        }
    }

    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self::new(catalog.products().to_vec())
    }

    /// Replace the snapshot, rebuild every index and drop cached suggestions.
    pub fn rebuild(&mut self, products: Vec<Product>) {
        self.index = CatalogIndex::build(products);
        self.suggestions.clear();
        self.metrics.engine_rebuilds.inc();
        info!("Search engine rebuilt with {} products", self.index.len());
    }

    pub fn products(&self) -> &[Product] {
        self.index.products()
    }

    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.suggestions.get_stats()
    }

    fn record(&self, result: SearchResult) -> SearchResult {
        self.metrics.searches_run.inc();
        self.metrics.matches_found.inc_by(result.matches_found as u64);
        debug!(
            "{} matched {} products in {:?}",
            result.algorithm.display_name(),
            result.matches_found,
            result.elapsed
        );
        result
    }

    fn run_text(&self, algorithm: Algorithm, query: &Query) -> SearchResult {
        match TextSearchFactory::create(algorithm) {
            Some(strategy) => self.record(strategy.run(&self.index, query)),
            None => SearchResult::empty(algorithm, Default::default()),
        }
    }

    pub fn linear_search(&self, query: &str) -> SearchResult {
        self.run_text(Algorithm::Linear, &Query::new(query))
    }

    pub fn indexed_search(&self, query: &str) -> SearchResult {
        self.run_text(Algorithm::Indexed, &Query::new(query))
    }

    pub fn fuzzy_search(&self, query: &str) -> SearchResult {
        self.run_text(Algorithm::Fuzzy, &Query::new(query))
    }

    pub fn regex_search(&self, query: &str) -> SearchResult {
        self.run_text(Algorithm::Regex, &Query::new(query))
    }

    pub fn price_range_search(&self, min_price: f64, max_price: f64) -> SearchResult {
        self.record(PriceRangeSearch::new(min_price, max_price).run(&self.index))
    }

    /// Run one strategy by identifier. `price_range` expects the query to be a
    /// `price:<min>-<max>` expression.
    pub fn search(&self, algorithm: &str, query: &str) -> Result<SearchResult> {
        match algorithm.parse::<Algorithm>()? {
            Algorithm::PriceRange => {
                let (min, max) = parse_price_range(query).ok_or_else(|| {
                    CatalogError::InvalidQuery(format!(
                        "expected price:<min>-<max>, got {query:?}"
                    ))
                })?;
                Ok(self.price_range_search(min, max))
            }
            text => Ok(self.run_text(text, &Query::new(query))),
        }
    }

    /// Fan `query` out to every applicable strategy.
    ///
    /// A `price:<min>-<max>` query runs only the price range search. Any other
    /// query runs the four text strategies, each result re-ranked by
    /// relevance to the query.
    pub fn run_all(&self, query: &str) -> SearchResults {
        let mut results = SearchResults::new();

        if let Some((min, max)) = parse_price_range(query) {
            let result = self.price_range_search(min, max);
            if !result.is_empty() {
                results.insert(Algorithm::PriceRange, result);
            }
            return results;
        }

        let query = Query::new(query);
        for algorithm in Algorithm::TEXT {
            let mut result = self.run_text(algorithm, &query);
            if result.is_empty() {
                continue;
            }
            rank_products(&mut result.products, &query);
            results.insert(algorithm, result);
        }
        results
    }

    /// Autocomplete with the configured default limit.
    pub fn default_suggestions(&self, query: &str) -> Vec<String> {
        self.suggest(query, self.config.max_suggestions)
    }

    /// Up to `max_suggestions` lowercase completions for a partial query,
    /// memoized per `(query, max_suggestions)`.
    pub fn suggest(&self, query: &str, max_suggestions: usize) -> Vec<String> {
        let key = CacheKey::new(query, max_suggestions);
        if let Some(cached) = self.suggestions.get(&key) {
            self.metrics.suggestion_cache_hits.inc();
            debug!("Suggestion cache hit for {:?}", key.query);
            return cached;
        }
        self.metrics.suggestion_cache_misses.inc();

        let suggestions = compute_suggestions(&self.index, &key.query, max_suggestions);
        self.suggestions.insert(key, suggestions.clone());
        suggestions
    }
}
