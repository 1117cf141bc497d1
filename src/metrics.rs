use prometheus::{Encoder, IntCounter, Opts, Registry, TextEncoder};
use std::sync::Arc;

#[derive(Clone)]
pub struct Metrics {
    pub searches_run: IntCounter,
    pub matches_found: IntCounter,
    pub suggestion_cache_hits: IntCounter,
    pub suggestion_cache_misses: IntCounter,
    pub engine_rebuilds: IntCounter,
    registry: Arc<Registry>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

fn counter(name: &str, help: &str) -> IntCounter {
    IntCounter::with_opts(Opts::new(name, help)).expect("static counter options are valid")
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();
        let searches_run = counter("searches_run", "Number of strategy runs");
        let matches_found = counter("matches_found", "Number of products matched across runs");
        let suggestion_cache_hits =
            counter("suggestion_cache_hits", "Suggestion lookups answered from cache");
        let suggestion_cache_misses =
            counter("suggestion_cache_misses", "Suggestion lookups computed from the indices");
        let engine_rebuilds = counter("engine_rebuilds", "Number of index rebuilds");

        registry.register(Box::new(searches_run.clone())).ok();
        registry.register(Box::new(matches_found.clone())).ok();
        registry.register(Box::new(suggestion_cache_hits.clone())).ok();
        registry.register(Box::new(suggestion_cache_misses.clone())).ok();
        registry.register(Box::new(engine_rebuilds.clone())).ok();

        Metrics {
            searches_run,
            matches_found,
            suggestion_cache_hits,
            suggestion_cache_misses,
            engine_rebuilds,
            registry: Arc::new(registry),
        }
    }

    pub fn gather(&self) -> String {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if encoder.encode(&metric_families, &mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_reports_counters() {
        let metrics = Metrics::new();
        metrics.searches_run.inc_by(4);
        let text = metrics.gather();
        assert!(text.contains("searches_run 4"));
        assert!(text.contains("engine_rebuilds 0"));
    }
}
