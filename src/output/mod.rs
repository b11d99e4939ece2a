//! Output module for exporting crawl results
//!
//! This module handles:
//! - Rendering the collected records as CSV and SQL
//! - Writing both files under a shared run timestamp
//! - Printing the final crawl summary

mod csv;
mod sql;
mod stats;
mod traits;

pub use csv::CsvExport;
pub use sql::SqlExport;
pub use stats::print_summary;
pub use traits::ExportFormat;

use crate::config::OutputConfig;
use crate::crawler::{retry_forever, RetryPolicy};
use crate::model::Puzzle;
use crate::CrawlError;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File stem format of export files, local time at completion
pub const TIMESTAMP_FORMAT: &str = "%d_%m_%Y_%H_%M_%S";

/// Current local time rendered as an export file stem
pub fn export_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Writes the records once per configured format
pub struct Exporter {
    formats: Vec<Box<dyn ExportFormat>>,
    retry: RetryPolicy,
}

impl Exporter {
    pub fn new(formats: Vec<Box<dyn ExportFormat>>, retry: RetryPolicy) -> Self {
        Self { formats, retry }
    }

    /// CSV and SQL exporters as configured in `[output]`
    pub fn from_config(config: &OutputConfig, backoff: Duration) -> Self {
        Self::new(
            vec![
                Box::new(CsvExport::new(&config.csv_separator)),
                Box::new(SqlExport::new(&config.table_name)),
            ],
            RetryPolicy::new(backoff),
        )
    }

    /// Writes every format into `dir`, named by the current timestamp
    pub async fn export(&self, records: &[Puzzle], dir: &Path) -> Result<Vec<PathBuf>, CrawlError> {
        self.export_as(records, dir, &export_timestamp()).await
    }

    /// Writes every format into `dir` as `<stem>.<extension>`
    ///
    /// I/O failures are retried until the write succeeds.
    pub async fn export_as(
        &self,
        records: &[Puzzle],
        dir: &Path,
        stem: &str,
    ) -> Result<Vec<PathBuf>, CrawlError> {
        let mut written = Vec::with_capacity(self.formats.len());

        for format in &self.formats {
            let path = dir.join(format!("{}.{}", stem, format.extension()));
            let contents = format.render(records);
            let label = path.display().to_string();

            retry_forever(&self.retry, &label, || tokio::fs::write(&path, &contents)).await?;

            tracing::info!("Exported {} records to {}", records.len(), label);
            written.push(path);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CSV_HEADER;
    use tempfile::TempDir;

    fn record() -> Puzzle {
        Puzzle {
            article_number: 12,
            title: "Море".to_string(),
            elements_count: 500,
            width: 48.0,
            height: 34.0,
            manufacturer: "Castorland".to_string(),
            country: "Польша".to_string(),
            image_path: "/tmp/images/12.jpg".to_string(),
            url: "https://example.com/12.html".to_string(),
        }
    }

    #[test]
    fn test_export_timestamp_shape() {
        let stamp = export_timestamp();
        let parts: Vec<&str> = stamp.split('_').collect();

        assert_eq!(parts.len(), 6);
        assert!(parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())));
        assert_eq!(parts[2].len(), 4);
    }

    #[tokio::test]
    async fn test_export_writes_both_files() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = Exporter::from_config(&OutputConfig::default(), Duration::from_millis(10));

        let written = exporter
            .export_as(&[record()], temp_dir.path(), "01_02_2024_03_04_05")
            .await
            .unwrap();

        assert_eq!(
            written,
            vec![
                temp_dir.path().join("01_02_2024_03_04_05.csv"),
                temp_dir.path().join("01_02_2024_03_04_05.sql"),
            ]
        );

        let csv = std::fs::read_to_string(&written[0]).unwrap();
        assert!(csv.starts_with(CSV_HEADER));
        assert_eq!(csv.lines().count(), 2);

        let sql = std::fs::read_to_string(&written[1]).unwrap();
        assert!(sql.starts_with("INSERT INTO table_name VALUES(12,'Море',500,48,34,"));
    }

    #[tokio::test]
    async fn test_export_with_no_records() {
        let temp_dir = TempDir::new().unwrap();
        let exporter = Exporter::from_config(&OutputConfig::default(), Duration::from_millis(10));

        let written = exporter.export(&[], temp_dir.path()).await.unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(
            std::fs::read_to_string(&written[0]).unwrap(),
            format!("{}\n", CSV_HEADER)
        );
        assert_eq!(std::fs::read_to_string(&written[1]).unwrap(), "");
    }
}
