//! Markup contract of the catalog site
//!
//! Selectors, property labels and text patterns the crawler relies on. These
//! describe the remote site's DOM and URL conventions; nothing else in the
//! crate hard-codes them.

use regex::Regex;
use scraper::Selector;
use std::sync::OnceLock;

/// Item block on listing pages and the product card on detail pages
pub const CARD_BODY: &str = "div.card-body";

/// First link of a card: item URL on listings, image link on detail pages
pub const CARD_LINK: &str = "a";

/// Bold label cell; the first one in a card holds the article number
pub const LABEL_CELL: &str = "div.col-12.col-md-5.font-weight-bold";

pub const TITLE_BLOCK: &str = "h1";

pub const PROPERTIES_BLOCK: &str = "div.description.extra_fields.text-muted";

pub const PROPERTY_VALUE: &str = "div.spec-value";

/// Bold numbers of the pagination bar: shown range, page size, total items
pub const NAVIGATION_NUMBERS: &str = "div.navigation span.bold";

pub const PIECE_COUNT_LABEL: &str = "Количество деталей:";

pub const SIZE_LABEL: &str = "Размер пазла:";

pub const MANUFACTURER_LABEL: &str = "Производитель:";

/// Piece counts below this are treated as misprints
pub const MIN_PLAUSIBLE_ELEMENTS: u32 = 15;

/// Compiled selectors, built once per process
pub struct Selectors {
    pub card_body: Selector,
    pub card_link: Selector,
    pub label_cell: Selector,
    pub title_block: Selector,
    pub properties_block: Selector,
    pub property_cell: Selector,
    pub navigation_numbers: Selector,
}

pub fn selectors() -> &'static Selectors {
    static SELECTORS: OnceLock<Selectors> = OnceLock::new();
    SELECTORS.get_or_init(|| Selectors {
        card_body: selector(CARD_BODY),
        card_link: selector(CARD_LINK),
        label_cell: selector(LABEL_CELL),
        title_block: selector(TITLE_BLOCK),
        properties_block: selector(PROPERTIES_BLOCK),
        property_cell: selector(&format!("{}, {}", LABEL_CELL, PROPERTY_VALUE)),
        navigation_numbers: selector(NAVIGATION_NUMBERS),
    })
}

/// Compiled text patterns, built once per process
pub struct Patterns {
    /// Any run of digits
    pub digits: Regex,
    /// Integer or decimal number (after decimal comma normalization)
    pub size_token: Regex,
    /// Piece count embedded in a detail URL slug
    pub url_piece_count: Regex,
    /// Manufacturer named in a title such as `Пазл Ravensburger ...`
    pub title_manufacturer: Regex,
    /// Title rules in priority order; group 1 is the title
    pub title_rules: Vec<Regex>,
}

pub fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        digits: regex(r"\d+"),
        size_token: regex(r"\d+\.\d+|\d+"),
        url_piece_count: regex(r"(\d+)-detalej"),
        title_manufacturer: regex(r"азл (\w+) "),
        title_rules: vec![
            // quoted name
            regex(r#""(.*)""#),
            // text between a colon and a digit
            regex(r": (.*) \d"),
            // "Пазл <name> <pieces>"
            regex(r"Пазл (.+) \d"),
            // "... деталей <name>"
            regex(r"деталей (.+)"),
        ],
    })
}

// Patterns above are literals; a parse failure is a build defect.
fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e:?}"))
}

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid pattern {pattern:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_compiles() {
        let _ = selectors();
        let p = patterns();
        assert_eq!(p.title_rules.len(), 4);
    }

    #[test]
    fn test_size_token_prefers_decimals() {
        let found: Vec<_> = patterns()
            .size_token
            .find_iter("68.5 x 48")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["68.5", "48"]);
    }

    #[test]
    fn test_url_piece_count() {
        let caps = patterns()
            .url_piece_count
            .captures("https://example.com/puzzle-1000-detalej-sea.html")
            .unwrap();
        assert_eq!(&caps[1], "1000");
    }
}
