use prodsearch::{Algorithm, Availability, Catalog, Engine, Product, SearchResult};
use proptest::prelude::*;
use std::collections::HashSet;

fn two_phones() -> Engine {
    Engine::new(vec![
        Product::new(
            1,
            "Apple iPhone 14 Pro",
            "Apple",
            419999.0,
            Availability::InStock,
            "Latest iPhone with A16 Bionic chip.",
            "Electronics",
            5,
        ),
        Product::new(
            2,
            "Samsung Galaxy S23 Ultra",
            "Samsung",
            389999.0,
            Availability::InStock,
            "Flagship Samsung phone.",
            "Electronics",
            4,
        ),
    ])
}

fn sample() -> Engine {
    Engine::from_catalog(&Catalog::sample())
}

fn ids(result: &SearchResult) -> Vec<u64> {
    result.products.iter().map(|p| p.id).collect()
}

fn assert_consistent(result: &SearchResult) {
    assert_eq!(result.matches_found, result.products.len(), "{}", result.algorithm);
    let unique: HashSet<u64> = result.products.iter().map(|p| p.id).collect();
    assert_eq!(unique.len(), result.products.len(), "{} returned duplicates", result.algorithm);
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_indexed_brand_lookup() {
        assert_eq!(ids(&two_phones().indexed_search("apple")), vec![1]);
    }

    #[test]
    fn test_price_range_orders_by_price() {
        let result = two_phones().price_range_search(380000.0, 420000.0);
        assert_eq!(ids(&result), vec![2, 1]);
        assert_eq!(result.matches_found, 2);
        assert_eq!(result.algorithm, Algorithm::PriceRange);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let result = two_phones().price_range_search(420000.0, 380000.0);
        assert_eq!(result.matches_found, 0);
    }

    #[test]
    fn test_invalid_regex_degrades_to_no_results() {
        let engine = sample();
        let result = engine.regex_search("[");
        assert_eq!(result.matches_found, 0);
        assert!(result.products.is_empty());
        assert!(engine.search("regex", "(unclosed").unwrap().products.is_empty());
    }

    #[test]
    fn test_regex_alternation() {
        let result = sample().regex_search("^(nike|puma)");
        assert_eq!(ids(&result), vec![22, 27]);
    }

    #[test]
    fn test_blank_queries_match_nothing() {
        let engine = sample();
        for query in ["", "   ", "\t\n"] {
            for algorithm in ["linear", "indexed", "fuzzy", "regex"] {
                let result = engine.search(algorithm, query).unwrap();
                assert_eq!(result.matches_found, 0, "{algorithm} on {query:?}");
            }
            assert!(engine.run_all(query).is_empty());
        }
    }

    #[test]
    fn test_every_strategy_consistent_on_sample_queries() {
        let engine = sample();
        let queries = [
            "apple", "laptop", "Galaxy", "jacket", "1 liter", "mcbook", "book", "shoes", "x",
        ];
        for query in queries {
            for algorithm in Algorithm::TEXT {
                assert_consistent(&engine.search(algorithm.id(), query).unwrap());
            }
        }
    }

    #[test]
    fn test_exact_names_found_by_linear_and_regex() {
        let engine = sample();
        for product in engine.products() {
            let name = product.name.to_lowercase();
            assert!(ids(&engine.linear_search(&name)).contains(&product.id), "{name}");
            let escaped = regex::escape(&name);
            assert!(ids(&engine.regex_search(&escaped)).contains(&product.id), "{name}");
        }
    }

    #[test]
    fn test_fuzzy_finds_misspelling() {
        let result = sample().fuzzy_search("mackbook air m2");
        assert_eq!(ids(&result)[0], 13);
    }
}

#[cfg(test)]
mod dispatcher_tests {
    use super::*;

    #[test]
    fn test_price_query_runs_only_range() {
        let results = sample().run_all("price:1000-5000");
        assert_eq!(results.len(), 1);
        let result = &results[&Algorithm::PriceRange];
        assert!(result.matches_found > 0);
        assert!(result.products.iter().all(|p| (1000.0..=5000.0).contains(&p.price)));
        assert!(result.products.windows(2).all(|w| w[0].price <= w[1].price));
    }

    #[test]
    fn test_price_prefix_with_trailing_words_runs_only_range() {
        let engine = sample();
        let results = engine.run_all("price:1000-2000 books");
        assert_eq!(results.keys().copied().collect::<Vec<_>>(), vec![Algorithm::PriceRange]);
        assert_eq!(
            ids(&results[&Algorithm::PriceRange]),
            ids(&engine.price_range_search(1000.0, 2000.0))
        );
    }

    #[test]
    fn test_text_query_reranks_each_strategy() {
        let results = sample().run_all("apple macbook");
        let linear = &results[&Algorithm::Linear];
        // linear alone sorts by name; the dispatcher puts the exact hits first
        assert!(linear.products[0].name.to_lowercase().contains("apple macbook"));
        assert!(linear.products[1].name.to_lowercase().contains("apple macbook"));
        for result in results.values() {
            assert_consistent(result);
        }
    }

    #[test]
    fn test_empty_catalog_yields_empty_map() {
        let engine = Engine::new(vec![]);
        for query in ["apple", "price:0-100", "[", "fuzzy thing"] {
            assert!(engine.run_all(query).is_empty(), "{query}");
        }
        assert!(engine.suggest("apple", 5).is_empty());
    }

    #[test]
    fn test_rebuild_after_catalog_change() {
        let mut catalog = Catalog::sample();
        let mut engine = Engine::from_catalog(&catalog);
        assert!(!engine.indexed_search("ikigai").products.is_empty());

        catalog.remove(44);
        catalog
            .add(Product::new(
                catalog.next_id(),
                "Kindle Paperwhite",
                "Amazon",
                35999.0,
                Availability::InStock,
                "Glare-free e-reader.",
                "Electronics",
                5,
            ))
            .unwrap();
        // stale until rebuilt
        assert!(engine.indexed_search("kindle").products.is_empty());

        engine.rebuild(catalog.products().to_vec());
        assert!(engine.indexed_search("ikigai").products.is_empty());
        assert_eq!(ids(&engine.indexed_search("kindle")), vec![51]);
    }

    #[test]
    fn test_suggestions_stable_and_bounded() {
        let engine = sample();
        let first = engine.suggest("iphone", 5);
        let second = engine.suggest("iphone", 5);
        assert_eq!(first, second);
        assert!(first.len() <= 5);
        for max in 0..4 {
            assert!(engine.suggest("a", max).len() <= max);
        }
        assert_eq!(engine.default_suggestions("samsung")[0], "samsung");
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<Engine>();
    }
}

proptest! {
    #[test]
    fn price_range_is_monotonic(
        lo in 0u32..500_000,
        width in 0u32..200_000,
        widen_lo in 0u32..50_000,
        widen_hi in 0u32..50_000,
    ) {
        let engine = sample();
        let (min, max) = (lo as f64, (lo + width) as f64);
        let narrow: HashSet<u64> = ids(&engine.price_range_search(min, max)).into_iter().collect();
        let wide: HashSet<u64> = ids(&engine.price_range_search(
            (min - widen_lo as f64).max(0.0),
            max + widen_hi as f64,
        ))
        .into_iter()
        .collect();
        prop_assert!(narrow.is_subset(&wide));
    }

    #[test]
    fn unbounded_range_returns_whole_catalog(
        prices in prop::collection::vec(0u32..1_000_000, 0..40)
    ) {
        let products: Vec<Product> = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| {
                Product::new(
                    i as u64,
                    "item",
                    "brand",
                    price as f64,
                    Availability::InStock,
                    "",
                    "misc",
                    0,
                )
            })
            .collect();
        let engine = Engine::new(products);
        let result = engine.price_range_search(0.0, f64::INFINITY);
        prop_assert_eq!(result.matches_found, prices.len());
        prop_assert!(result.products.windows(2).all(|w| w[0].price <= w[1].price));
    }

    #[test]
    fn any_query_is_consistent(query in "[a-z ]{0,12}") {
        let engine = sample();
        for algorithm in Algorithm::TEXT {
            let result = engine.search(algorithm.id(), &query).unwrap();
            prop_assert_eq!(result.matches_found, result.products.len());
            let unique: HashSet<u64> = result.products.iter().map(|p| p.id).collect();
            prop_assert_eq!(unique.len(), result.products.len());
        }
    }
}
