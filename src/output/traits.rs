//! Export format trait

use crate::model::Puzzle;

/// A flat text rendering of the collected records
///
/// Each format produces one file per crawl, named after the run timestamp
/// and the format's extension.
pub trait ExportFormat: Send + Sync {
    /// File extension without the leading dot
    fn extension(&self) -> &'static str;

    /// Renders every record, one line each, newline-terminated
    fn render(&self, records: &[Puzzle]) -> String;
}
