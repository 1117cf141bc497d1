use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "Unknown search algorithm: {0} (expected one of linear, indexed, fuzzy, regex, price_range)"
    )]
    UnknownAlgorithm(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Duplicate product id: {0}")]
    DuplicateProduct(u64),

    #[error("No product with id: {0}")]
    UnknownProduct(u64),

    #[error("Invalid product {id}: {reason}")]
    InvalidProduct { id: u64, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("An unexpected error occurred: {0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
