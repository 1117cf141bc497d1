//! Rendering of search results, suggestions and product listings
use crate::catalog::{Product, MAX_RATING};
use crate::config::DisplayConfig;
use crate::search::engine::SearchResults;
use crate::search::SearchResult;
use clap::ValueEnum;
use colored::*;
use serde_json::{json, Value};
use std::fmt;

/// Output format types
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Output formatter for different formats
pub struct OutputFormatter {
    format: OutputFormat,
    show_timing: bool,
    show_summary: bool,
    max_results: Option<usize>,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            show_timing: true,
            show_summary: true,
            max_results: None,
        }
    }

    pub fn with_display(mut self, display: &DisplayConfig) -> Self {
        self.show_timing = display.show_timing;
        self.show_summary = display.show_summary;
        self.max_results = display.max_results;
        self
    }

    pub fn with_timing(mut self, include: bool) -> Self {
        self.show_timing = include;
        self
    }

    fn shown<'a>(&self, products: &'a [Product]) -> &'a [Product] {
        match self.max_results {
            Some(limit) if limit < products.len() => &products[..limit],
            _ => products,
        }
    }

    /// Format the dispatcher's per-strategy results
    pub fn format_results(&self, query: &str, results: &SearchResults) -> String {
        match self.format {
            OutputFormat::Text => self.results_text(query, results),
            OutputFormat::Json => self.results_json(query, results).to_string(),
        }
    }

    /// Format a single strategy run
    pub fn format_result(&self, query: &str, result: &SearchResult) -> String {
        match self.format {
            OutputFormat::Text => {
                let mut out = String::new();
                self.push_result_text(&mut out, result);
                if result.products.is_empty() {
                    out.push_str(&format!("{} {query:?}\n", "No products found for".yellow()));
                }
                out
            }
            OutputFormat::Json => json!({
                "query": query,
                "result": self.result_json(result),
            })
            .to_string(),
        }
    }

    pub fn format_suggestions(&self, query: &str, suggestions: &[String]) -> String {
        match self.format {
            OutputFormat::Text => {
                if suggestions.is_empty() {
                    return format!("{}\n", "No suggestions".yellow());
                }
                suggestions
                    .iter()
                    .map(|s| format!("  {} {}\n", "→".cyan(), s))
                    .collect()
            }
            OutputFormat::Json => json!({
                "query": query,
                "suggestions": suggestions,
            })
            .to_string(),
        }
    }

    pub fn format_products(&self, products: &[&Product]) -> String {
        match self.format {
            OutputFormat::Text => products.iter().map(|p| product_text(p)).collect(),
            OutputFormat::Json => {
                Value::Array(products.iter().map(|p| product_json(p)).collect()).to_string()
            }
        }
    }

    fn results_text(&self, query: &str, results: &SearchResults) -> String {
        if results.is_empty() {
            return format!("{} {query:?}\n", "No products found for".yellow());
        }

        let mut out = String::new();
        if self.show_summary {
            out.push_str(&format!("{}\n", "Search Algorithm Performance Comparison".bold()));
            out.push_str(&format!("{:<20} {:>8} {:>12}\n", "Algorithm", "Matches", "Time (ms)"));
            for result in results.values() {
                out.push_str(&format!(
                    "{:<20} {:>8} {:>12.3}\n",
                    result.algorithm.display_name(),
                    result.matches_found,
                    result.elapsed.as_secs_f64() * 1000.0
                ));
            }
        }

        for result in results.values() {
            self.push_result_text(&mut out, result);
        }
        out
    }

    fn push_result_text(&self, out: &mut String, result: &SearchResult) {
        let mut heading = format!(
            "\n{} ({} matches",
            result.algorithm.display_name().green().bold(),
            result.matches_found
        );
        if self.show_timing {
            heading.push_str(&format!(", {:.2}ms", result.elapsed.as_secs_f64() * 1000.0));
        }
        heading.push_str(")\n");
        out.push_str(&heading);
        out.push_str(&format!("{}\n", "-".repeat(80).dimmed()));

        let shown = self.shown(&result.products);
        for product in shown {
            out.push_str(&product_text(product));
        }
        if shown.len() < result.products.len() {
            out.push_str(&format!(
                "{}\n",
                format!("... {} more", result.products.len() - shown.len()).dimmed()
            ));
        }
    }

    fn results_json(&self, query: &str, results: &SearchResults) -> Value {
        let mut map = serde_json::Map::new();
        for (algorithm, result) in results {
            map.insert(algorithm.id().to_string(), self.result_json(result));
        }
        json!({
            "query": query,
            "results": map,
        })
    }

    fn result_json(&self, result: &SearchResult) -> Value {
        let mut value = json!({
            "algorithm": result.algorithm.id(),
            "algorithm_name": result.algorithm.display_name(),
            "matches_found": result.matches_found,
            "products": self.shown(&result.products).iter().map(product_json).collect::<Vec<_>>(),
        });
        if self.show_timing {
            value["time_ms"] = json!(result.elapsed.as_secs_f64() * 1000.0);
        }
        value
    }
}

fn stars(rating: u8) -> String {
    let filled = rating.min(MAX_RATING) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(MAX_RATING as usize - filled))
}

fn product_text(product: &Product) -> String {
    let availability = if product.is_in_stock() {
        product.availability.to_string().green()
    } else {
        product.availability.to_string().red()
    };
    format!(
        "  {} {} ({})\n    Price: PKR {} | Rating: {} | {}\n    {} | Category: {}\n",
        format!("[{}]", product.id).dimmed(),
        product.name.bold(),
        product.brand,
        product.price,
        stars(product.rating).yellow(),
        availability,
        product.description,
        product.category
    )
}

fn product_json(product: &Product) -> Value {
    serde_json::to_value(product).unwrap_or(Value::Null)
}
