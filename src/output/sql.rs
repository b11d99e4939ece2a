//! SQL insert statement export

use crate::model::Puzzle;
use crate::output::traits::ExportFormat;

/// One `INSERT` statement per record
#[derive(Debug, Clone)]
pub struct SqlExport {
    table_name: String,
}

impl SqlExport {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
        }
    }
}

impl ExportFormat for SqlExport {
    fn extension(&self) -> &'static str {
        "sql"
    }

    fn render(&self, records: &[Puzzle]) -> String {
        records
            .iter()
            .map(|record| record.sql_insert(&self.table_name) + "\n")
            .collect()
    }
}
