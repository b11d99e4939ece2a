/// Progress counters for one crawl run
///
/// The expected figures come from the catalog summary. `expected_items` shrinks
/// whenever an item turns out to be out of scope, so `remaining_items` is only
/// an estimate until the run finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlCounters {
    pub expected_pages: u32,
    pub expected_items: u32,
    pub completed_pages: u32,
    pub completed_items: u32,
}

impl CrawlCounters {
    /// Counters at the start of a run
    pub fn new(expected_pages: u32, expected_items: u32) -> Self {
        Self {
            expected_pages,
            expected_items,
            completed_pages: 0,
            completed_items: 0,
        }
    }

    pub fn reset_completed(&mut self) {
        self.completed_pages = 0;
        self.completed_items = 0;
    }

    /// An item was dropped as out of scope; saturates at zero
    pub fn item_excluded(&mut self) {
        self.expected_items = self.expected_items.saturating_sub(1);
    }

    pub fn item_completed(&mut self) {
        self.completed_items += 1;
    }

    pub fn page_completed(&mut self) {
        self.completed_pages += 1;
    }

    /// Advisory; may go negative mid-run if the summary undercounted
    pub fn remaining_items(&self) -> i64 {
        i64::from(self.expected_items) - i64::from(self.completed_items)
    }

    pub fn remaining_pages(&self) -> i64 {
        i64::from(self.expected_pages) - i64::from(self.completed_pages)
    }

    /// True when every page finished and no item was counted twice
    pub fn is_consistent(&self) -> bool {
        self.completed_pages == self.expected_pages && self.completed_items <= self.expected_items
    }
}
