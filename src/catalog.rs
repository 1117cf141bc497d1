//! Product records and the in-memory catalog store the search engine indexes
use crate::config::ensure_parent_dir;
use crate::error::{CatalogError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Availability {
    #[default]
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::InStock => write!(f, "In Stock"),
            Availability::OutOfStock => write!(f, "Out of Stock"),
        }
    }
}

/// A single catalog entry.
///
/// Identity is the `id` alone and comparisons between records go through the
/// price. Neither is expressed as `PartialEq`/`PartialOrd` so that callers
/// pick the comparator they mean: [`Product::same_identity`] or
/// [`Product::cmp_by_price`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub brand: String,
    pub price: f64,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub rating: u8,
}

impl Product {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u64,
        name: &str,
        brand: &str,
        price: f64,
        availability: Availability,
        description: &str,
        category: &str,
        rating: u8,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            brand: brand.to_string(),
            price,
            availability,
            description: description.to_string(),
            category: category.to_string(),
            rating,
        }
    }

    /// Total order on price. Ties (and NaN, which the catalog rejects) fall
    /// back to `f64::total_cmp`.
    pub fn cmp_by_price(&self, other: &Product) -> Ordering {
        self.price.total_cmp(&other.price)
    }

    /// Two records denote the same entity iff their ids are equal.
    pub fn same_identity(&self, other: &Product) -> bool {
        self.id == other.id
    }

    pub fn is_in_stock(&self) -> bool {
        self.availability == Availability::InStock
    }

    fn validate(&self) -> Result<()> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(CatalogError::InvalidProduct {
                id: self.id,
                reason: format!("price must be a non-negative number, got {}", self.price),
            });
        }
        if self.rating > MAX_RATING {
            return Err(CatalogError::InvalidProduct {
                id: self.id,
                reason: format!("rating must be between 0 and {MAX_RATING}, got {}", self.rating),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "[{}] {} ({}) - Rs. {} | {} | Rating: {}",
            self.id, self.name, self.brand, self.price, self.availability, self.rating
        )?;
        write!(f, "{} | Category: {}", self.description, self.category)
    }
}

/// Ordered, id-keyed product store.
///
/// The search engine takes a snapshot of [`Catalog::products`] at
/// construction. Any `add`/`remove` afterwards leaves that snapshot stale
/// until the caller rebuilds the engine.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    by_id: HashMap<u64, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Result<Self> {
        let mut catalog = Self::new();
        for product in products {
            catalog.add(product)?;
        }
        Ok(catalog)
    }

    pub fn add(&mut self, product: Product) -> Result<()> {
        product.validate()?;
        if self.by_id.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id));
        }
        self.by_id.insert(product.id, self.products.len());
        self.products.push(product);
        Ok(())
    }

    pub fn remove(&mut self, id: u64) -> Option<Product> {
        let position = self.by_id.remove(&id)?;
        let removed = self.products.remove(position);
        for slot in self.by_id.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    pub fn get(&self, id: u64) -> Option<&Product> {
        self.by_id.get(&id).map(|&i| &self.products[i])
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn next_id(&self) -> u64 {
        self.by_id.keys().max().map_or(1, |id| id + 1)
    }

    /// Highest rated first; equal ratings keep catalog order.
    pub fn top_rated(&self, n: usize) -> Vec<&Product> {
        let mut ranked: Vec<&Product> = self.products.iter().collect();
        ranked.sort_by(|a, b| b.rating.cmp(&a.rating));
        ranked.truncate(n);
        ranked
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
        let products: Vec<Product> = serde_json::from_str(&content)?;
        Self::from_products(products)
    }

    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.products)?;
        ensure_parent_dir(path)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write catalog file: {}", path.display()))?;
        Ok(())
    }

    /// The demo catalog: ten products in each of five categories.
    pub fn sample() -> Self {
        use Availability::{InStock, OutOfStock};

        let seed: [(&str, &str, f64, Availability, &str, &str, u8); 50] = [
            (
                "Apple iPhone 14 Pro",
                "Apple",
                419999.0,
                InStock,
                "Latest iPhone with A16 Bionic chip.",
                "Electronics",
                5,
            ),
            (
                "Samsung Galaxy S23 Ultra",
                "Samsung",
                389999.0,
                InStock,
                "Flagship Samsung phone.",
                "Electronics",
                4,
            ),
            (
                "Sony WH-1000XM5",
                "Sony",
                84999.0,
                InStock,
                "Noise-canceling headphones.",
                "Electronics",
                5,
            ),
            (
                "Xiaomi Redmi Note 12",
                "Xiaomi",
                74999.0,
                OutOfStock,
                "Budget phone with great performance.",
                "Electronics",
                4,
            ),
            (
                "Dell 27-inch Monitor",
                "Dell",
                44000.0,
                InStock,
                "Full HD UltraSharp monitor.",
                "Electronics",
                4,
            ),
            (
                "Canon EOS 1500D",
                "Canon",
                115000.0,
                InStock,
                "DSLR Camera with 24.1MP CMOS Sensor.",
                "Electronics",
                4,
            ),
            (
                "JBL Flip 5 Speaker",
                "JBL",
                14999.0,
                InStock,
                "Waterproof portable Bluetooth speaker.",
                "Electronics",
                5,
            ),
            (
                "Samsung Galaxy Tab S8",
                "Samsung",
                119999.0,
                OutOfStock,
                "Android flagship tablet.",
                "Electronics",
                4,
            ),
            (
                "Apple AirPods Pro",
                "Apple",
                49999.0,
                InStock,
                "Active noise cancellation wireless earbuds.",
                "Electronics",
                5,
            ),
            (
                "Mi Power Bank 3i",
                "Xiaomi",
                2999.0,
                InStock,
                "20000mAh fast charging power bank.",
                "Electronics",
                4,
            ),
            ("Dell XPS 13", "Dell", 289999.0, InStock, "Premium ultrabook laptop.", "Laptops", 5),
            (
                "HP Spectre x360",
                "HP",
                259999.0,
                InStock,
                "Convertible 2-in-1 laptop.",
                "Laptops",
                4,
            ),
            (
                "Apple MacBook Air M2",
                "Apple",
                329999.0,
                InStock,
                "Lightweight MacBook with M2 chip.",
                "Laptops",
                5,
            ),
            (
                "Lenovo ThinkPad X1 Carbon",
                "Lenovo",
                275000.0,
                InStock,
                "Business ultrabook, durable and light.",
                "Laptops",
                4,
            ),
            (
                "Asus ROG Zephyrus G14",
                "Asus",
                209999.0,
                InStock,
                "Gaming laptop with Ryzen 9.",
                "Laptops",
                5,
            ),
            (
                "Acer Aspire 7",
                "Acer",
                99999.0,
                InStock,
                "Budget gaming and productivity laptop.",
                "Laptops",
                4,
            ),
            (
                "MSI Modern 15",
                "MSI",
                119999.0,
                InStock,
                "Sleek design, powerful performance.",
                "Laptops",
                4,
            ),
            ("HP Pavilion 14", "HP", 84999.0, InStock, "Affordable everyday laptop.", "Laptops", 3),
            (
                "Dell Inspiron 15",
                "Dell",
                79999.0,
                InStock,
                "15-inch laptop for students.",
                "Laptops",
                4,
            ),
            (
                "Apple MacBook Pro M3",
                "Apple",
                459999.0,
                OutOfStock,
                "High-end MacBook for professionals.",
                "Laptops",
                5,
            ),
            (
                "Levi's 501 Jeans",
                "Levi's",
                7999.0,
                InStock,
                "Classic straight-fit jeans.",
                "Clothing",
                4,
            ),
            ("Nike Air Max", "Nike", 15999.0, OutOfStock, "Popular running shoes.", "Clothing", 5),
            (
                "Adidas Tiro 21 Track Pants",
                "Adidas",
                4999.0,
                InStock,
                "Comfortable football pants.",
                "Clothing",
                4,
            ),
            (
                "Zara Casual Shirt",
                "Zara",
                2999.0,
                InStock,
                "Slim fit printed shirt.",
                "Clothing",
                4,
            ),
            ("H&M Basic T-shirt", "H&M", 1299.0, InStock, "Soft cotton t-shirt.", "Clothing", 3),
            (
                "Uniqlo Ultra Light Down Jacket",
                "Uniqlo",
                5999.0,
                InStock,
                "Warm, light winter jacket.",
                "Clothing",
                5,
            ),
            (
                "Puma Men's Hoodie",
                "Puma",
                3499.0,
                InStock,
                "Classic black pullover hoodie.",
                "Clothing",
                4,
            ),
            (
                "Levi's Trucker Jacket",
                "Levi's",
                8999.0,
                OutOfStock,
                "Iconic denim jacket.",
                "Clothing",
                5,
            ),
            (
                "Allen Solly Formal Trousers",
                "Allen Solly",
                2499.0,
                InStock,
                "Slim fit formal pants.",
                "Clothing",
                3,
            ),
            (
                "Adidas Ultraboost Shoes",
                "Adidas",
                19999.0,
                InStock,
                "High performance running shoes.",
                "Clothing",
                5,
            ),
            ("Nestle Milk Pack", "Nestle", 200.0, InStock, "1 liter milk pack.", "Grocery", 3),
            ("Tata Salt", "Tata", 60.0, InStock, "Iodized salt 1kg.", "Grocery", 4),
            ("Amul Butter", "Amul", 105.0, InStock, "100g salted butter.", "Grocery", 5),
            ("Kissan Mixed Fruit Jam", "Kissan", 145.0, InStock, "500g fruit jam.", "Grocery", 4),
            (
                "Tropicana Orange Juice",
                "Tropicana",
                120.0,
                InStock,
                "1 liter orange juice.",
                "Grocery",
                4,
            ),
            (
                "Aashirvaad Atta",
                "Aashirvaad",
                400.0,
                InStock,
                "10kg whole wheat flour.",
                "Grocery",
                5,
            ),
            (
                "Fortune Sunflower Oil",
                "Fortune",
                160.0,
                InStock,
                "1 liter cooking oil.",
                "Grocery",
                4,
            ),
            ("MTR Masala", "MTR", 70.0, InStock, "100g garam masala powder.", "Grocery", 3),
            (
                "Brook Bond Red Label Tea",
                "Brook Bond",
                120.0,
                InStock,
                "250g tea pack.",
                "Grocery",
                4,
            ),
            (
                "Britannia Good Day Biscuits",
                "Britannia",
                35.0,
                OutOfStock,
                "200g pack of biscuits.",
                "Grocery",
                4,
            ),
            (
                "Python Crash Course",
                "Eric Matthes",
                2500.0,
                InStock,
                "Best-selling Python programming book.",
                "Books",
                5,
            ),
            (
                "The Alchemist",
                "Paulo Coelho",
                1200.0,
                InStock,
                "International bestseller novel.",
                "Books",
                4,
            ),
            (
                "Atomic Habits",
                "James Clear",
                1800.0,
                InStock,
                "Guide to building good habits.",
                "Books",
                5,
            ),
            (
                "Ikigai",
                "Hector Garcia",
                1400.0,
                InStock,
                "Japanese secret to a long and happy life.",
                "Books",
                4,
            ),
            (
                "The Lean Startup",
                "Eric Ries",
                2100.0,
                InStock,
                "Entrepreneurship and innovation guide.",
                "Books",
                5,
            ),
            (
                "Think and Grow Rich",
                "Napoleon Hill",
                1100.0,
                InStock,
                "Classic self-help book.",
                "Books",
                4,
            ),
            ("Deep Work", "Cal Newport", 1700.0, InStock, "Rules for focused success.", "Books", 5),
            (
                "To Kill a Mockingbird",
                "Harper Lee",
                900.0,
                InStock,
                "Pulitzer Prize-winning novel.",
                "Books",
                5,
            ),
            (
                "Rich Dad Poor Dad",
                "Robert Kiyosaki",
                1600.0,
                OutOfStock,
                "Personal finance classic.",
                "Books",
                4,
            ),
            (
                "The Psychology of Money",
                "Morgan Housel",
                1950.0,
                InStock,
                "Timeless lessons on wealth.",
                "Books",
                5,
            ),
        ];

        let mut catalog = Self::new();
        for (i, (name, brand, price, availability, description, category, rating)) in
            seed.into_iter().enumerate()
        {
            let product = Product::new(
                i as u64 + 1,
                name,
                brand,
                price,
                availability,
                description,
                category,
                rating,
            );
            catalog.by_id.insert(product.id, catalog.products.len());
            catalog.products.push(product);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn phone(id: u64, price: f64) -> Product {
        Product::new(id, "Phone", "Brand", price, Availability::InStock, "", "Electronics", 3)
    }

    #[test]
    fn test_identity_ignores_other_fields() {
        let a = phone(7, 10.0);
        let mut b = phone(7, 99.0);
        b.name = "Different".to_string();
        assert!(a.same_identity(&b));
        assert!(!a.same_identity(&phone(8, 10.0)));
    }

    #[test]
    fn test_price_ordering() {
        assert_eq!(phone(1, 10.0).cmp_by_price(&phone(2, 20.0)), Ordering::Less);
        assert_eq!(phone(1, 20.0).cmp_by_price(&phone(2, 10.0)), Ordering::Greater);
        assert_eq!(phone(1, 10.0).cmp_by_price(&phone(2, 10.0)), Ordering::Equal);
    }

    #[test]
    fn test_add_rejects_duplicates_and_bad_fields() {
        let mut catalog = Catalog::new();
        catalog.add(phone(1, 10.0)).unwrap();
        assert!(matches!(catalog.add(phone(1, 5.0)), Err(CatalogError::DuplicateProduct(1))));
        assert!(matches!(
            catalog.add(phone(2, -1.0)),
            Err(CatalogError::InvalidProduct { id: 2, .. })
        ));
        assert!(catalog.add(phone(3, f64::NAN)).is_err());
        let mut loud = phone(4, 1.0);
        loud.rating = 6;
        assert!(catalog.add(loud).is_err());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_remove_keeps_lookup_consistent() {
        let mut catalog = Catalog::from_products((1..=4).map(|i| phone(i, i as f64))).unwrap();
        let removed = catalog.remove(2).unwrap();
        assert_eq!(removed.id, 2);
        assert!(catalog.get(2).is_none());
        assert_eq!(catalog.get(4).unwrap().id, 4);
        assert_eq!(catalog.get(3).unwrap().id, 3);
        assert!(catalog.remove(2).is_none());
        assert_eq!(catalog.next_id(), 5);
    }

    #[test]
    fn test_sample_catalog() {
        let catalog = Catalog::sample();
        assert_eq!(catalog.len(), 50);
        assert_eq!(catalog.get(1).unwrap().name, "Apple iPhone 14 Pro");
        assert_eq!(catalog.next_id(), 51);
    }

    #[test]
    fn test_top_rated_is_stable() {
        let catalog = Catalog::sample();
        let top = catalog.top_rated(3);
        assert_eq!(top.len(), 3);
        assert!(top.iter().all(|p| p.rating == 5));
        assert_eq!(top[0].id, 1);
        assert_eq!(top[1].id, 3);
    }

    #[test]
    fn test_json_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        Catalog::sample().to_json_file(&path).unwrap();
        let loaded = Catalog::from_json_file(&path).unwrap();
        assert_eq!(loaded.len(), 50);
        assert_eq!(loaded.get(22).unwrap().availability, Availability::OutOfStock);
    }
}
