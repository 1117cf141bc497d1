//! Lookup structures built once from a catalog snapshot
use crate::catalog::Product;
use log::debug;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

/// Position of a product inside the indexed snapshot.
pub type ProductIdx = usize;

pub type TokenIndex = HashMap<String, BTreeSet<ProductIdx>>;

/// One row of the price index, ordered by `(price, id)`.
#[derive(Debug, Clone, Copy)]
pub struct PriceEntry {
    pub price: f64,
    pub id: u64,
}

impl PriceEntry {
    pub fn cmp_key(&self, other: &PriceEntry) -> Ordering {
        self.price
            .total_cmp(&other.price)
            .then(self.id.cmp(&other.id))
    }
}

/// Lowercase, then split on whitespace. Empty input yields no tokens.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(str::to_lowercase)
}

/// Every index the strategies read, plus the snapshot they point into.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    products: Vec<Product>,
    positions: HashMap<u64, ProductIdx>,
    name_tokens: TokenIndex,
    brands: TokenIndex,
    categories: TokenIndex,
    full_text: TokenIndex,
    prices: Vec<PriceEntry>,
    fuzzy_corpus: Vec<(String, ProductIdx)>,
}

impl CatalogIndex {
    pub fn build(products: Vec<Product>) -> Self {
        let start = Instant::now();
        let mut index = Self {
            positions: HashMap::with_capacity(products.len()),
            prices: Vec::with_capacity(products.len()),
            fuzzy_corpus: Vec::with_capacity(products.len()),
            ..Self::default()
        };

        for (idx, product) in products.iter().enumerate() {
            index.positions.insert(product.id, idx);

            for word in tokenize(&product.name) {
                index.name_tokens.entry(word).or_default().insert(idx);
            }
            index
                .brands
                .entry(product.brand.to_lowercase())
                .or_default()
                .insert(idx);
            index
                .categories
                .entry(product.category.to_lowercase())
                .or_default()
                .insert(idx);

            index.prices.push(PriceEntry {
                price: product.price,
                id: product.id,
            });
            index.fuzzy_corpus.push((product.name.to_lowercase(), idx));

            let fields = [
                &product.name,
                &product.brand,
                &product.category,
                &product.description,
            ];
            for word in fields.into_iter().flat_map(|f| tokenize(f)) {
                index.full_text.entry(word).or_default().insert(idx);
            }
        }

        index.prices.sort_by(PriceEntry::cmp_key);
        index.products = products;

        debug!(
            "Indexed {} products ({} name tokens, {} full-text tokens) in {:?}",
            index.products.len(),
            index.name_tokens.len(),
            index.full_text.len(),
            start.elapsed()
        );
        index
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, idx: ProductIdx) -> &Product {
        &self.products[idx]
    }

    pub fn position_of(&self, id: u64) -> Option<ProductIdx> {
        self.positions.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn name_tokens(&self) -> &TokenIndex {
        &self.name_tokens
    }

    pub fn brands(&self) -> &TokenIndex {
        &self.brands
    }

    pub fn categories(&self) -> &TokenIndex {
        &self.categories
    }

    pub fn full_text(&self) -> &TokenIndex {
        &self.full_text
    }

    pub fn prices(&self) -> &[PriceEntry] {
        &self.prices
    }

    pub fn fuzzy_corpus(&self) -> &[(String, ProductIdx)] {
        &self.fuzzy_corpus
    }
}
