//! Listing walker: one task per catalog page, one sub-task per item on it

use crate::crawler::context::CrawlContext;
use crate::crawler::extractor::Extraction;
use crate::crawler::markup::selectors;
use crate::state::{CrawlEvent, DiscardReason, EventSender};
use crate::url::resolve_link;
use crate::CrawlError;
use scraper::Html;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Item links of a listing page, as written in the markup
///
/// One link per item block: the first anchor with an `href`.
pub fn parse_listing(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let s = selectors();

    document
        .select(&s.card_body)
        .filter_map(|block| {
            block
                .select(&s.card_link)
                .next()
                .and_then(|link| link.value().attr("href"))
                .map(str::to_string)
        })
        .collect()
}

/// True if a listing link points at the excluded subtype
pub fn is_excluded_url(href: &str, marker: &str) -> bool {
    href.contains(marker)
}

/// Hands an outcome to the aggregator
///
/// The aggregator outlives every task of a run; a failed send means the run
/// is being torn down and the outcome has nowhere to go.
fn report(events: &EventSender, event: CrawlEvent) {
    if let Err(e) = events.send(event) {
        tracing::warn!("Outcome dropped, aggregator is gone: {:?}", e.0);
    }
}

/// Processes listing page `index` and every item on it
///
/// Excluded items are reported and never fetched. All item tasks are joined
/// before the page is reported complete; the first fatal item error aborts
/// the page.
pub async fn process_page(
    ctx: Arc<CrawlContext>,
    events: EventSender,
    index: u32,
) -> Result<(), CrawlError> {
    let page = ctx.listing_page(index).await?;
    let links = parse_listing(&page);
    tracing::debug!("Page {} lists {} items", index, links.len());

    let mut items = JoinSet::new();
    for href in links {
        if is_excluded_url(&href, &ctx.excluded_marker) {
            report(
                &events,
                CrawlEvent::ItemDiscarded {
                    url: href,
                    reason: DiscardReason::ExcludedByUrl,
                },
            );
            continue;
        }

        let Some(url) = resolve_link(&href, &ctx.host) else {
            tracing::warn!("Page {}: unusable item link {:?}", index, href);
            report(
                &events,
                CrawlEvent::ItemDiscarded {
                    url: href,
                    reason: DiscardReason::Incomplete,
                },
            );
            continue;
        };

        items.spawn(process_item(ctx.clone(), events.clone(), url.to_string()));
    }

    while let Some(joined) = items.join_next().await {
        joined??;
    }

    report(&events, CrawlEvent::PageCompleted { index });
    Ok(())
}

/// Fetches one detail page, extracts it, and reports the outcome
pub async fn process_item(
    ctx: Arc<CrawlContext>,
    events: EventSender,
    url: String,
) -> Result<(), CrawlError> {
    let document = ctx.detail_document(&url).await?;

    let extraction = ctx.extractor.extract(&document, &url);

    let event = match extraction {
        Extraction::Draft(draft) => {
            let image_path = ctx.download_image(&draft.image_url).await?;
            CrawlEvent::ItemProduced(draft.into_puzzle(image_path, url))
        }
        Extraction::Excluded => CrawlEvent::ItemDiscarded {
            url,
            reason: DiscardReason::ExcludedByTitle,
        },
        Extraction::Incomplete { missing } => {
            tracing::debug!("Puzzle page {} has no {}", url, missing);
            CrawlEvent::ItemDiscarded {
                url,
                reason: DiscardReason::Incomplete,
            }
        }
        Extraction::Malformed { detail } => CrawlEvent::ItemMalformed { url, detail },
    };

    report(&events, event);
    Ok(())
}
