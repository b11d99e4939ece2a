//! URL helpers for the catalog host
//!
//! Resolving links found in markup, composing listing page URLs, and taking
//! the trailing path segment that names cached files.

use url::Url;

/// Resolves a link href against the catalog host
///
/// Returns None for empty hrefs, fragment-only anchors, `javascript:`,
/// `mailto:`, `tel:` and `data:` links, and anything that does not resolve
/// to an HTTP(S) URL.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" => {
            Some(absolute_url)
        }
        _ => None,
    }
}

/// URL of one listing page: the catalog URL with `?page=N`
pub fn listing_page_url(catalog_url: &Url, index: u32) -> Url {
    let mut url = catalog_url.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair("page", &index.to_string());
    url
}

/// Text after the last `/`, the file name used for cached copies
///
/// ```
/// use puzzle_crawler::url::url_tail;
///
/// assert_eq!(url_tail("https://example.com/puzzles/night-city.html"), "night-city.html");
/// assert_eq!(url_tail("https://example.com/"), "");
/// ```
pub fn url_tail(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
