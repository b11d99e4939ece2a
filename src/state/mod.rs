//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlCounters`: expected and completed page/item counts
//! - `CrawlEvent`: what a page or item task reports when it finishes
//! - `spawn_aggregator`: the single owner of the counters and the record list

mod counters;
mod events;

// Re-export main types
pub use counters::CrawlCounters;
pub use events::{spawn_aggregator, CrawlEvent, CrawlReport, DiscardReason, EventSender};
