//! Puzzle-Crawler main entry point
//!
//! This is the command-line interface for the jigsaw puzzle catalog crawler.

use anyhow::Context;
use clap::Parser;
use puzzle_crawler::cache::StorageLayout;
use puzzle_crawler::config::{load_config_with_hash, validate, Config};
use puzzle_crawler::crawler::run_crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Puzzle-Crawler: a jigsaw puzzle catalog harvester
///
/// Puzzle-Crawler walks every listing page of the catalog, extracts one
/// record per puzzle, downloads product images, and exports the records as
/// CSV and SQL. Fetched pages are cached so repeated runs stay cheap.
#[derive(Parser, Debug)]
#[command(name = "puzzle-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A jigsaw puzzle catalog crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (stock catalog settings if omitted)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory for images, cache and exports (overrides the config)
    #[arg(long, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = load(cli.config.as_deref())?;

    if let Some(base_dir) = cli.base_dir {
        config.output.base_directory = base_dir;
        validate(&config).context("Invalid base directory")?;
    }

    if cli.dry_run {
        handle_dry_run(&config);
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("puzzle_crawler=info,warn"),
            1 => EnvFilter::new("puzzle_crawler=debug,info"),
            2 => EnvFilter::new("puzzle_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file, or the stock settings when none is given
fn load(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using stock catalog settings");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Handles the --dry-run mode: shows the effective settings and layout
fn handle_dry_run(config: &Config) {
    let layout = StorageLayout::new(&config.output.base_directory);

    println!("=== Puzzle-Crawler Dry Run ===\n");

    println!("Site:");
    println!("  Host: {}", config.site.host_url);
    println!("  Start page: {}", config.site.start_page);
    println!("  Catalog: {}", config.site.catalog_name);
    println!("  Excluded marker: {}", config.site.excluded_marker);

    println!("\nCrawler Configuration:");
    println!("  Max connections: {}", config.crawler.max_connections);
    println!("  Retry backoff: {}ms", config.crawler.retry_backoff_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!(
        "  Accept invalid certificates: {}",
        config.crawler.accept_invalid_certs
    );

    println!("\nOutput:");
    println!("  Base directory: {}", layout.base_dir().display());
    println!("  Images: {}", layout.images_dir().display());
    println!("  Page cache: {}", layout.pages_dir().display());
    println!("  Puzzle cache: {}", layout.puzzles_dir().display());
    println!("  SQL table: {}", config.output.table_name);
    println!("  CSV separator: {:?}", config.output.csv_separator);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {}{} into {}",
        config.site.host_url,
        config.site.start_page,
        config.output.base_directory.display()
    );

    match run_crawl(config).await {
        Ok(outcome) => {
            tracing::info!(
                "Crawl completed successfully: {} records",
                outcome.report.records.len()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
