//! Record extraction from puzzle detail pages
//!
//! A detail page is turned into a `PuzzleDraft` by a fixed cascade of
//! heuristics. Each field has a fallback, so a page yields a draft unless it
//! is structurally incomplete, out of scope, or carries unreadable dimensions.

use crate::crawler::markup::{
    patterns, selectors, MANUFACTURER_LABEL, MIN_PLAUSIBLE_ELEMENTS, PIECE_COUNT_LABEL, SIZE_LABEL,
};
use crate::model::Puzzle;
use crate::url::resolve_link;
use scraper::{ElementRef, Html};
use std::collections::HashMap;
use url::Url;

/// Result of extracting one detail page
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// All fields were derived; the image still has to be downloaded
    Draft(PuzzleDraft),

    /// The title names the excluded subtype
    Excluded,

    /// A required zone of the page is missing
    Incomplete { missing: &'static str },

    /// The size property does not hold exactly two numbers
    Malformed { detail: String },
}

/// A record minus its local image path
#[derive(Debug, Clone, PartialEq)]
pub struct PuzzleDraft {
    pub article_number: u64,
    pub title: String,
    pub elements_count: u32,
    pub width: f64,
    pub height: f64,
    pub manufacturer: String,
    pub country: String,
    pub image_url: Url,
}

impl PuzzleDraft {
    /// Completes the record once the image is stored locally
    pub fn into_puzzle(self, image_path: String, url: String) -> Puzzle {
        Puzzle {
            article_number: self.article_number,
            title: self.title,
            elements_count: self.elements_count,
            width: self.width,
            height: self.height,
            manufacturer: self.manufacturer,
            country: self.country,
            image_path,
            url,
        }
    }
}

/// Extracts puzzle records from detail documents of one catalog host
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    host: Url,
    excluded_marker: String,
}

/// The four zones a detail card must contain
struct Zones<'a> {
    image_href: &'a str,
    article: ElementRef<'a>,
    title: ElementRef<'a>,
    properties: ElementRef<'a>,
}

impl RecordExtractor {
    pub fn new(host: Url, excluded_marker: &str) -> Self {
        Self {
            host,
            excluded_marker: excluded_marker.to_lowercase(),
        }
    }

    /// Runs the extraction cascade over one detail page
    ///
    /// `page_url` is the page's own URL, used as a last resort for the piece
    /// count.
    pub fn extract(&self, html: &str, page_url: &str) -> Extraction {
        let document = Html::parse_document(html);

        let zones = match locate_zones(&document) {
            Ok(zones) => zones,
            Err(missing) => return Extraction::Incomplete { missing },
        };

        let title_text = element_text(zones.title);
        let title_text = title_text.trim();
        if title_text.to_lowercase().contains(&self.excluded_marker) {
            return Extraction::Excluded;
        }

        let image_url = match resolve_link(zones.image_href, &self.host) {
            Some(url) => url,
            None => return Extraction::Incomplete { missing: "image link" },
        };

        let properties = read_properties(zones.properties);

        let (width, height) = match properties.get(SIZE_LABEL) {
            Some(value) => match parse_dimensions(value) {
                Ok(size) => size,
                Err(detail) => return Extraction::Malformed { detail },
            },
            None => (0.0, 0.0),
        };

        let (manufacturer, country) = match properties.get(MANUFACTURER_LABEL) {
            Some(value) => parse_manufacturer(value),
            None => (manufacturer_from_title(title_text), String::new()),
        };

        Extraction::Draft(PuzzleDraft {
            article_number: first_number(&element_text(zones.article)).unwrap_or(0),
            title: extract_title(title_text),
            elements_count: elements_count(properties.get(PIECE_COUNT_LABEL), page_url),
            width,
            height,
            manufacturer,
            country,
            image_url,
        })
    }
}

/// Finds the card zones, naming the first one that is absent
fn locate_zones(document: &Html) -> Result<Zones<'_>, &'static str> {
    let s = selectors();

    let card = document.select(&s.card_body).next().ok_or("card body")?;
    let image_href = card
        .select(&s.card_link)
        .next()
        .ok_or("image link")?
        .value()
        .attr("href")
        .ok_or("image link")?;
    let article = card.select(&s.label_cell).next().ok_or("article block")?;
    let title = card.select(&s.title_block).next().ok_or("title block")?;
    let properties = card
        .select(&s.properties_block)
        .next()
        .ok_or("properties block")?;

    Ok(Zones {
        image_href,
        article,
        title,
        properties,
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Pairs each property label with the first value cell that follows it
fn read_properties(block: ElementRef<'_>) -> HashMap<String, String> {
    let s = selectors();

    let cells: Vec<(bool, String)> = block
        .select(&s.property_cell)
        .map(|cell| {
            let is_label = s.label_cell.matches(&cell);
            (is_label, element_text(cell).trim().to_string())
        })
        .collect();

    let mut properties = HashMap::new();
    for (i, (is_label, label)) in cells.iter().enumerate() {
        if !is_label {
            continue;
        }
        if let Some((_, value)) = cells[i + 1..].iter().find(|(is_label, _)| !is_label) {
            properties.insert(label.clone(), value.clone());
        }
    }
    properties
}

fn first_number<T: std::str::FromStr>(text: &str) -> Option<T> {
    patterns()
        .digits
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

/// Applies the title rules in priority order; the raw text is the fallback
pub fn extract_title(text: &str) -> String {
    patterns()
        .title_rules
        .iter()
        .find_map(|rule| rule.captures(text).map(|caps| caps[1].to_string()))
        .unwrap_or_else(|| text.to_string())
}

/// Piece count from the property, or from the URL slug when implausibly low
pub fn elements_count(property: Option<&String>, page_url: &str) -> u32 {
    let count = property.and_then(|value| first_number(value)).unwrap_or(0);
    if count >= MIN_PLAUSIBLE_ELEMENTS {
        return count;
    }

    patterns()
        .url_piece_count
        .captures(page_url)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

/// Reads `width x height` from the size property
///
/// Exactly two numbers are required.
pub fn parse_dimensions(value: &str) -> Result<(f64, f64), String> {
    let normalized = value.replace(',', ".");
    let sizes: Vec<f64> = patterns()
        .size_token
        .find_iter(&normalized)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();

    match sizes.as_slice() {
        [width, height] => Ok((*width, *height)),
        _ => Err(format!(
            "expected 2 numbers in size {:?}, found {}",
            value,
            sizes.len()
        )),
    }
}

/// Splits `Ravensburger (Германия)` into manufacturer and country
pub fn parse_manufacturer(value: &str) -> (String, String) {
    let manufacturer = value.split_whitespace().next().unwrap_or("").to_string();

    let country = value
        .rfind('(')
        .map(|open| {
            let inner = &value[open + 1..];
            inner.split(')').next().unwrap_or(inner).trim().to_string()
        })
        .unwrap_or_default();

    (manufacturer, country)
}

fn manufacturer_from_title(title: &str) -> String {
    patterns()
        .title_manufacturer
        .captures(title)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}
