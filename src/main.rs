use colored::*;
use env_logger::{Builder, Target};
use log::{info, warn, LevelFilter};
use prodsearch::catalog::{Availability, Catalog, Product};
use prodsearch::config::{ensure_parent_dir, Config};
use prodsearch::error::{CatalogError, Result};
use prodsearch::{Cli, Commands, Engine, Metrics, OutputFormatter, Parser};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    setup_logging(cli)?;

    let start_time = Instant::now();
    info!("Application started with command: {:?}", cli.command);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            warn!("Ignoring unreadable configuration: {e:#}");
            Config::default()
        }),
    };

    if let Commands::InitConfig { path } = &cli.command {
        Config::default().save(path)?;
        println!("{} {}", "Wrote default configuration to".green(), path.display());
        return Ok(());
    }

    let catalog_path = cli.catalog.as_deref().or(config.catalog.as_deref());
    let mut catalog = match catalog_path {
        Some(path) if path.exists() || !cli.command.edits_catalog() => {
            info!("Loading catalog from {}", path.display());
            Catalog::from_json_file(path)?
        }
        Some(path) => {
            info!("Starting new catalog at {}", path.display());
            Catalog::new()
        }
        None => Catalog::sample(),
    };

    let metrics = Arc::new(Metrics::new());
    let mut engine = Engine::with_config(
        catalog.products().to_vec(),
        config.engine.clone(),
        Arc::clone(&metrics),
    );
    let formatter = OutputFormatter::new(cli.format).with_display(&config.display);

    match &cli.command {
        Commands::Search { query } => {
            let results = engine.run_all(query);
            print!("{}", formatter.format_results(query, &results));
        }
        Commands::Algo { algorithm, query } => {
            let result = engine.search(algorithm, query)?;
            print!("{}", formatter.format_result(query, &result));
        }
        Commands::Range { min, max } => {
            let result = engine.price_range_search(*min, *max);
            print!("{}", formatter.format_result(&format!("price:{min}-{max}"), &result));
        }
        Commands::Suggest { query, max } => {
            let suggestions = match max {
                Some(max) => engine.suggest(query, *max),
                None => engine.default_suggestions(query),
            };
            print!("{}", formatter.format_suggestions(query, &suggestions));
        }
        Commands::List { top } => {
            let products: Vec<_> = match top {
                Some(n) => catalog.top_rated(*n),
                None => catalog.products().iter().collect(),
            };
            print!("{}", formatter.format_products(&products));
        }
        Commands::Add {
            name,
            brand,
            price,
            category,
            description,
            rating,
            out_of_stock,
            id,
        } => {
            let path = editable_catalog(catalog_path)?;
            let availability = if *out_of_stock {
                Availability::OutOfStock
            } else {
                Availability::InStock
            };
            let product = Product::new(
                id.unwrap_or_else(|| catalog.next_id()),
                name,
                brand,
                *price,
                availability,
                description,
                category,
                *rating,
            );
            catalog.add(product.clone())?;
            save_and_reindex(&catalog, path, &mut engine)?;
            print!("{}", formatter.format_products(&[&product]));
        }
        Commands::Remove { id } => {
            let path = editable_catalog(catalog_path)?;
            let removed = catalog.remove(*id).ok_or(CatalogError::UnknownProduct(*id))?;
            save_and_reindex(&catalog, path, &mut engine)?;
            print!("{}", formatter.format_products(&[&removed]));
        }
        Commands::InitConfig { .. } => {}
    }
    println!();

    if cli.metrics {
        print!("{}", metrics.gather());
    }

    info!(
        "Application finished. Total elapsed time: {:.2?}",
        start_time.elapsed()
    );
    Ok(())
}

fn editable_catalog(path: Option<&Path>) -> Result<&Path> {
    path.ok_or_else(|| {
        CatalogError::Config(
            "editing needs a catalog file: pass --catalog or set `catalog` in the config".into(),
        )
    })
}

/// Persist the edited catalog, then point the engine at the new snapshot.
fn save_and_reindex(catalog: &Catalog, path: &Path, engine: &mut Engine) -> Result<()> {
    catalog.to_json_file(path)?;
    engine.rebuild(catalog.products().to_vec());
    info!(
        "Saved {} products to {}; engine now indexes {}",
        catalog.len(),
        path.display(),
        engine.products().len()
    );
    Ok(())
}

/// `RUST_LOG` wins when set; otherwise `--verbose` picks debug over info for
/// this crate only.
fn setup_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let mut builder = Builder::new();
    match std::env::var("RUST_LOG") {
        Ok(filters) => builder.parse_filters(&filters),
        Err(_) => builder
            .filter_level(LevelFilter::Warn)
            .filter_module("prodsearch", level),
    };

    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(
            buf,
            "{} {:<5} {}: {}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    let target = match &cli.log {
        Some(log_path) => {
            ensure_parent_dir(log_path)?;
            Target::Pipe(Box::new(fs::File::create(log_path)?))
        }
        None => Target::Stderr,
    };
    builder.target(target);

    builder
        .try_init()
        .map_err(|e| CatalogError::Other(e.to_string()))
}
