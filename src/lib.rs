pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod output;
pub mod search;

pub use crate::catalog::{Availability, Catalog, Product};
pub use crate::config::{Config, EngineConfig};
pub use crate::error::{CatalogError, Result};
pub use crate::metrics::Metrics;
pub use crate::search::engine::{parse_price_range, SearchResults};
pub use crate::search::{Algorithm, Engine, SearchResult};
pub use clap::Parser;
pub use cli::{Cli, Commands};
pub use output::{OutputFormat, OutputFormatter};
