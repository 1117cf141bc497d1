use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON product catalog; defaults to the built-in demo catalog
    #[clap(long, value_parser, global = true)]
    pub catalog: Option<PathBuf>,

    /// Configuration file; defaults to the usual lookup locations
    #[clap(long, value_parser, global = true)]
    pub config: Option<PathBuf>,

    #[clap(long, value_parser, default_value_t = false, global = true)]
    pub verbose: bool,

    #[clap(long, value_parser, global = true)]
    pub log: Option<PathBuf>,

    #[clap(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Print collected metrics after the command
    #[clap(long, value_parser, default_value_t = false, global = true)]
    pub metrics: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every strategy (or the price range search for `price:<min>-<max>`)
    Search { query: String },
    /// Run one strategy: linear, indexed, fuzzy, regex or price_range
    Algo { algorithm: String, query: String },
    /// Products priced within [min, max]
    Range { min: f64, max: f64 },
    /// Autocomplete a partial query
    Suggest {
        query: String,

        #[clap(short, long, value_parser)]
        max: Option<usize>,
    },
    /// List the catalog, or only its top rated products
    List {
        #[clap(long, value_parser)]
        top: Option<usize>,
    },
    /// Add a product to the catalog file and re-index it
    Add {
        #[clap(long, value_parser)]
        name: String,

        #[clap(long, value_parser)]
        brand: String,

        #[clap(long, value_parser)]
        price: f64,

        #[clap(long, value_parser, default_value = "")]
        category: String,

        #[clap(long, value_parser, default_value = "")]
        description: String,

        #[clap(long, value_parser, default_value_t = 0)]
        rating: u8,

        #[clap(long, value_parser, default_value_t = false)]
        out_of_stock: bool,

        /// Defaults to one past the highest id in the catalog
        #[clap(long, value_parser)]
        id: Option<u64>,
    },
    /// Remove a product from the catalog file and re-index it
    Remove { id: u64 },
    /// Write a default configuration file
    InitConfig {
        #[clap(default_value = ".prodsearch.toml")]
        path: PathBuf,
    },
}

impl Commands {
    /// Whether the command writes the catalog file back.
    pub fn edits_catalog(&self) -> bool {
        matches!(self, Commands::Add { .. } | Commands::Remove { .. })
    }
}
