//! Crawl outcome events and the aggregator that owns all mutable crawl state
//!
//! Page and item tasks never touch shared state directly. Each reports what
//! happened as a `CrawlEvent`; a single aggregator task applies the events to
//! the counters and collects the records.

use crate::model::Puzzle;
use crate::state::CrawlCounters;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Why an item was dropped before a record was built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// The listing URL names the excluded subtype; the detail page is never fetched
    ExcludedByUrl,

    /// The detail title names the excluded subtype
    ExcludedByTitle,

    /// The detail document lacks one of the required zones
    Incomplete,
}

/// Outcome reported by a page or item task
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    /// A record was extracted
    ItemProduced(Puzzle),

    /// The item is out of scope; expected items shrink by one
    ItemDiscarded { url: String, reason: DiscardReason },

    /// Dimensions could not be read; no record and no counter change
    ItemMalformed { url: String, detail: String },

    /// A listing page and all of its items are finished
    PageCompleted { index: u32 },
}

/// Final state handed back by the aggregator
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    pub counters: CrawlCounters,
    pub records: Vec<Puzzle>,
    pub malformed: u32,
}

/// Sending half given to every crawl task
pub type EventSender = mpsc::UnboundedSender<CrawlEvent>;

/// Starts the aggregator task
///
/// The task runs until every `EventSender` clone is dropped, then returns the
/// report.
pub fn spawn_aggregator(counters: CrawlCounters) -> (EventSender, JoinHandle<CrawlReport>) {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        let mut report = CrawlReport {
            counters,
            ..CrawlReport::default()
        };

        while let Some(event) = rx.recv().await {
            apply(&mut report, event);
        }

        report
    });

    (tx, handle)
}

/// Applies one event to the report, logging progress
fn apply(report: &mut CrawlReport, event: CrawlEvent) {
    let counters = &mut report.counters;
    match event {
        CrawlEvent::ItemProduced(puzzle) => {
            counters.item_completed();
            tracing::info!(
                "Puzzles: processed {}, remaining {}",
                counters.completed_items,
                counters.remaining_items()
            );
            report.records.push(puzzle);
        }
        CrawlEvent::ItemDiscarded { url, reason } => {
            counters.item_excluded();
            tracing::debug!("Skipped {} ({:?})", url, reason);
        }
        CrawlEvent::ItemMalformed { url, detail } => {
            report.malformed += 1;
            tracing::warn!("Malformed puzzle page {}: {}", url, detail);
        }
        CrawlEvent::PageCompleted { index } => {
            counters.page_completed();
            tracing::info!(
                "Pages: finished page {}, processed {}, remaining {}",
                index,
                counters.completed_pages,
                counters.remaining_pages()
            );
        }
    }
}
