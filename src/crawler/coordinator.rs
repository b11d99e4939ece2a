//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the top level of a crawl run:
//! - Reading the catalog summary to size the crawl
//! - Fanning out one task per listing page
//! - Collecting outcomes through the aggregator
//! - Exporting the records once every page is done

use crate::cache::StorageLayout;
use crate::config::Config;
use crate::crawler::context::CrawlContext;
use crate::crawler::listing::process_page;
use crate::crawler::markup::selectors;
use crate::output::{print_summary, Exporter};
use crate::state::{spawn_aggregator, CrawlCounters, CrawlReport};
use crate::CrawlError;
use scraper::Html;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Counts shown in the catalog's pagination bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogSummary {
    pub items_per_page: u32,
    pub total_items: u32,
}

impl CatalogSummary {
    /// Number of listing pages to walk
    ///
    /// Always one more than the whole pages, even when the total divides evenly.
    /// Saturates at `u32::MAX`.
    pub fn total_pages(&self) -> u32 {
        (self.total_items / self.items_per_page).saturating_add(1)
    }
}

/// Reads the pagination summary of a listing page
///
/// The bar holds three bold numbers: the shown range, the page size and the
/// total item count.
pub fn parse_summary(html: &str) -> Result<CatalogSummary, CrawlError> {
    let document = Html::parse_document(html);
    let numbers: Vec<String> = document
        .select(&selectors().navigation_numbers)
        .map(|element| element.text().collect())
        .collect();

    if numbers.len() < 3 {
        return Err(CrawlError::Summary(format!(
            "expected 3 numbers in the navigation bar, found {}",
            numbers.len()
        )));
    }

    let items_per_page = parse_count(&numbers[1], "items per page")?;
    let total_items = parse_count(&numbers[2], "total items")?;

    if items_per_page == 0 {
        return Err(CrawlError::Summary("items per page is zero".to_string()));
    }

    Ok(CatalogSummary {
        items_per_page,
        total_items,
    })
}

fn parse_count(text: &str, what: &str) -> Result<u32, CrawlError> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits
        .parse()
        .map_err(|_| CrawlError::Summary(format!("{} is not a number: {:?}", what, text.trim())))
}

/// Main crawler coordinator structure
pub struct Coordinator {
    context: Arc<CrawlContext>,
    counters: CrawlCounters,
}

impl Coordinator {
    /// Creates a coordinator and sizes the crawl from the catalog summary
    ///
    /// Listing page 1 doubles as the summary page and is cached like any
    /// other listing page.
    pub async fn new(config: &Config, layout: &StorageLayout) -> Result<Self, CrawlError> {
        let context = CrawlContext::new(config, layout)?;
        tracing::info!("Catalog: {}", context.catalog);

        let summary = parse_summary(&context.listing_page(1).await?)?;
        let counters = CrawlCounters::new(summary.total_pages(), summary.total_items);

        tracing::info!("Pages to process: {}", counters.expected_pages);
        tracing::info!("Puzzles to process: {}", counters.expected_items);

        Ok(Self {
            context: Arc::new(context),
            counters,
        })
    }

    pub fn counters(&self) -> CrawlCounters {
        self.counters
    }

    /// Runs the crawl to completion
    ///
    /// The first fatal error aborts every outstanding page and item task.
    pub async fn run(&mut self) -> Result<CrawlReport, CrawlError> {
        tracing::info!("Starting crawl");
        self.counters.reset_completed();

        let (events, aggregator) = spawn_aggregator(self.counters);

        let mut pages = JoinSet::new();
        for index in 1..=self.counters.expected_pages {
            pages.spawn(process_page(self.context.clone(), events.clone(), index));
        }
        drop(events);

        while let Some(joined) = pages.join_next().await {
            joined??;
        }

        let report = aggregator.await?;
        self.counters = report.counters;
        Ok(report)
    }
}

/// Outcome of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub report: CrawlReport,
    pub exports: Vec<PathBuf>,
}

/// Runs a complete crawl operation
///
/// 1. Create the directory layout
/// 2. Size the crawl from the catalog summary
/// 3. Walk every listing page and item
/// 4. Export the records as CSV and SQL
///
/// Nothing is exported if the crawl fails.
///
/// # Example
///
/// ```no_run
/// use puzzle_crawler::config::Config;
/// use puzzle_crawler::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = run_crawl(Config::default()).await?;
/// println!("{} puzzles", outcome.report.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlOutcome, CrawlError> {
    let layout = StorageLayout::new(&config.output.base_directory);
    layout.create_all()?;

    let mut coordinator = Coordinator::new(&config, &layout).await?;
    let report = coordinator.run().await?;

    let exporter = Exporter::from_config(&config.output, config.crawler.retry_backoff());
    let exports = exporter.export(&report.records, layout.base_dir()).await?;

    print_summary(&report, layout.base_dir());

    Ok(CrawlOutcome { report, exports })
}
