//! Catalog data model
//!
//! - `Category`: a named catalog section, used as the crawl's catalog key
//! - `Puzzle`: one extracted product record, immutable once built

mod category;
mod puzzle;

pub use category::Category;
pub use puzzle::{Puzzle, CSV_HEADER};
