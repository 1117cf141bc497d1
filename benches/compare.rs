use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use prodsearch::{Algorithm, Availability, Catalog, Engine, Product};
use std::hint::black_box;

/// The demo catalog repeated `copies` times with fresh ids.
fn scaled_catalog(copies: u64) -> Vec<Product> {
    let sample = Catalog::sample();
    let base = sample.len() as u64;
    (0..copies)
        .flat_map(|copy| {
            sample.products().iter().map(move |p| Product {
                id: copy * base + p.id,
                availability: Availability::InStock,
                ..p.clone()
            })
        })
        .collect()
}

fn strategies(c: &mut Criterion) {
    let engine = Engine::new(scaled_catalog(20));
    let mut group = c.benchmark_group("strategies");

    for algorithm in Algorithm::TEXT {
        for query in ["apple", "samsnug galaxy", "lap.*top"] {
            group.bench_with_input(BenchmarkId::new(algorithm.id(), query), &query, |b, q| {
                b.iter(|| engine.search(algorithm.id(), black_box(q)));
            });
        }
    }
    group.bench_function("price_range", |b| {
        b.iter(|| engine.price_range_search(black_box(1000.0), black_box(50000.0)));
    });
    group.finish();
}

fn dispatcher(c: &mut Criterion) {
    let engine = Engine::new(scaled_catalog(20));
    c.bench_function("run_all", |b| b.iter(|| engine.run_all(black_box("apple macbook"))));
    c.bench_function("suggest_cached", |b| b.iter(|| engine.suggest(black_box("app"), 5)));
    c.bench_function("build_index", |b| {
        let products = scaled_catalog(20);
        b.iter(|| Engine::new(black_box(products.clone())))
    });
}

criterion_group!(benches, strategies, dispatcher);
criterion_main!(benches);
