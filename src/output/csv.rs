//! Delimited text export

use crate::model::{Puzzle, CSV_HEADER};
use crate::output::traits::ExportFormat;

/// CSV with a header row and every field quoted
#[derive(Debug, Clone)]
pub struct CsvExport {
    separator: String,
}

impl CsvExport {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    fn header(&self) -> String {
        CSV_HEADER.replace(';', &self.separator)
    }
}

impl ExportFormat for CsvExport {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn render(&self, records: &[Puzzle]) -> String {
        let mut out = self.header();
        out.push('\n');
        for record in records {
            out.push_str(&record.csv_row(&self.separator));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> Puzzle {
        Puzzle {
            article_number: 7,
            title: title.to_string(),
            elements_count: 1000,
            width: 68.0,
            height: 48.0,
            manufacturer: "Ravensburger".to_string(),
            country: "Германия".to_string(),
            image_path: "/tmp/images/7.jpg".to_string(),
            url: "https://example.com/7.html".to_string(),
        }
    }

    #[test]
    fn test_render_header_only_when_empty() {
        let csv = CsvExport::new(";").render(&[]);
        assert_eq!(csv, format!("{}\n", CSV_HEADER));
    }

    #[test]
    fn test_render_rows() {
        let csv = CsvExport::new(";").render(&[record("Море"), record("Лес")]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1].contains("\"Море\""));
        assert!(lines[2].contains("\"Лес\""));
        assert!(csv.ends_with('\n'));
    }

    #[test]
    fn test_custom_separator_applies_to_header() {
        let csv = CsvExport::new(",").render(&[record("Море")]);
        let mut lines = csv.lines();

        assert!(lines.next().unwrap().starts_with("article_number,title,"));
        assert!(lines.next().unwrap().starts_with("\"7\",\"Море\","));
    }
}
