//! Crawler module for catalog walking and record extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a connection cap and retry-forever policy
//! - The markup contract of the catalog site
//! - Listing page walking and per-item record extraction
//! - Overall crawl coordination

mod context;
mod coordinator;
mod extractor;
mod fetcher;
mod listing;
pub mod markup;
mod retry;

pub use context::CrawlContext;
pub use coordinator::{parse_summary, run_crawl, CatalogSummary, Coordinator, CrawlOutcome};
pub use extractor::{
    elements_count, extract_title, parse_dimensions, parse_manufacturer, Extraction, PuzzleDraft,
    RecordExtractor,
};
pub use fetcher::{build_http_client, Fetcher};
pub use listing::{is_excluded_url, parse_listing, process_item, process_page};
pub use retry::{retry_forever, FailureKind, Retryable, RetryPolicy, DEFAULT_BACKOFF};
