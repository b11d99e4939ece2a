//! The puzzle record and its two flat text renderings

/// Header row of the CSV export; columns follow `Puzzle` field order
pub const CSV_HEADER: &str =
    "article_number;title;elements_count;width;height;manufacturer;country;image_path;url";

/// One jigsaw puzzle extracted from a catalog detail page
#[derive(Debug, Clone, PartialEq)]
pub struct Puzzle {
    /// Catalog article number, 0 when the page carries none
    pub article_number: u64,

    pub title: String,

    /// Piece count, 0 when unknown
    pub elements_count: u32,

    pub width: f64,

    pub height: f64,

    pub manufacturer: String,

    pub country: String,

    /// Local path of the downloaded product image
    pub image_path: String,

    /// Detail page the record was extracted from
    pub url: String,
}

impl Puzzle {
    /// Renders the record as one CSV line without a trailing newline
    ///
    /// Every field is double-quoted regardless of type.
    pub fn csv_row(&self, separator: &str) -> String {
        [
            self.article_number.to_string(),
            self.title.clone(),
            self.elements_count.to_string(),
            self.width.to_string(),
            self.height.to_string(),
            self.manufacturer.clone(),
            self.country.clone(),
            self.image_path.clone(),
            self.url.clone(),
        ]
        .iter()
        .map(|field| format!("\"{}\"", field.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(separator)
    }

    /// Renders the record as a single `INSERT` statement
    pub fn sql_insert(&self, table_name: &str) -> String {
        format!(
            "INSERT INTO {} VALUES({},{},{},{},{},{},{},{},{});",
            table_name,
            self.article_number,
            sql_text(&self.title),
            self.elements_count,
            self.width,
            self.height,
            sql_text(&self.manufacturer),
            sql_text(&self.country),
            sql_text(&self.image_path),
            sql_text(&self.url),
        )
    }
}

fn sql_text(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
