//! Final crawl summary printed to stdout

use crate::state::CrawlReport;
use std::path::Path;

/// Prints the outcome of a finished crawl in a formatted manner
pub fn print_summary(report: &CrawlReport, base_dir: &Path) {
    let counters = &report.counters;

    println!("=== Crawl Complete ===\n");

    println!("Processed:");
    println!(
        "  Pages: {} / {}",
        counters.completed_pages, counters.expected_pages
    );
    println!(
        "  Puzzles: {} / {}",
        counters.completed_items, counters.expected_items
    );
    println!("  Records exported: {}", report.records.len());

    if report.malformed > 0 {
        println!("  Malformed pages skipped: {}", report.malformed);
    }
    println!();

    if !counters.is_consistent() {
        tracing::warn!(
            "Counters disagree at completion: {} pages, {} puzzles outstanding",
            counters.remaining_pages(),
            counters.remaining_items()
        );
    }

    println!("Data saved to: {}", base_dir.display());
}
