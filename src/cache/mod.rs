//! On-disk content cache
//!
//! Every document and image the crawler downloads is stored as a file whose
//! name is derived from the page index or the URL tail. A file that exists is
//! a cache hit and is trusted as-is: there is no expiry and no revalidation.
//!
//! # Components
//!
//! - `ContentCache`: one cache directory with retrying reads and writes
//! - `Payload`: text or binary content that can live in the cache
//! - `StorageLayout`: the directory tree under the base directory

mod layout;
mod store;

pub use layout::StorageLayout;
pub use store::{ContentCache, Fetched, Payload, Source};

/// Cache file name of a listing page: `{stem}_{index}.{ext}` of the start page
///
/// ```
/// use puzzle_crawler::cache::page_key;
///
/// assert_eq!(page_key("proizvoditeli.html", 4), "proizvoditeli_4.html");
/// assert_eq!(page_key("catalog", 2), "catalog_2");
/// ```
pub fn page_key(start_page: &str, index: u32) -> String {
    match start_page.rsplit_once('.') {
        Some((stem, extension)) => format!("{}_{}.{}", stem, index, extension),
        None => format!("{}_{}", start_page, index),
    }
}
