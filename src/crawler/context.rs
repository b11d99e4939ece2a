//! Read-only resources shared by every crawl task
//!
//! Listing pages, detail documents and images all go through the same
//! cache-or-fetch path; this module only picks the cache, key and URL.

use crate::cache::{page_key, ContentCache, Source, StorageLayout};
use crate::config::Config;
use crate::crawler::extractor::RecordExtractor;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::retry::RetryPolicy;
use crate::model::Category;
use crate::url::{listing_page_url, url_tail};
use crate::CrawlError;
use url::Url;

/// Everything a page or item task needs, shared behind an `Arc`
#[derive(Debug)]
pub struct CrawlContext {
    pub fetcher: Fetcher,
    pub extractor: RecordExtractor,
    pub host: Url,
    pub catalog: Category,
    pub excluded_marker: String,
    catalog_url: Url,
    start_page: String,
    pages: ContentCache,
    puzzles: ContentCache,
    images: ContentCache,
}

impl CrawlContext {
    /// Builds the context for a crawl of `config.site` stored under `layout`
    pub fn new(config: &Config, layout: &StorageLayout) -> Result<Self, CrawlError> {
        let host = Url::parse(&config.site.host_url)?;
        let catalog_url = host.join(&config.site.start_page)?;
        let retry = RetryPolicy::new(config.crawler.retry_backoff());

        Ok(Self {
            fetcher: Fetcher::new(&config.crawler)?,
            extractor: RecordExtractor::new(host.clone(), &config.site.excluded_marker),
            catalog: Category::new(config.site.catalog_name.clone(), catalog_url.as_str()),
            excluded_marker: config.site.excluded_marker.clone(),
            host,
            catalog_url,
            start_page: config.site.start_page.clone(),
            pages: layout.pages_cache(&retry),
            puzzles: layout.puzzles_cache(&retry),
            images: layout.images_cache(&retry),
        })
    }

    /// Text of listing page `index`
    pub async fn listing_page(&self, index: u32) -> Result<String, CrawlError> {
        let key = page_key(&self.start_page, index);
        let url = listing_page_url(&self.catalog_url, index);

        let fetched = self
            .pages
            .get_or_fetch(&key, || async {
                tracing::info!("Pages: fetching {}", index);
                self.fetcher.fetch(url.as_str()).await
            })
            .await?;

        match fetched.source {
            Source::Cache => tracing::info!("Pages: got {} from cache", index),
            Source::Network => tracing::info!("Pages: got {}", index),
        }
        Ok(fetched.content)
    }

    /// Text of the detail document at `url`
    pub async fn detail_document(&self, url: &str) -> Result<String, CrawlError> {
        let key = url_tail(url);
        let name = key.split('.').next().unwrap_or(key);

        let fetched = self
            .puzzles
            .get_or_fetch(key, || async {
                tracing::info!("Puzzles: fetching {}", name);
                self.fetcher.fetch(url).await
            })
            .await?;

        match fetched.source {
            Source::Cache => tracing::info!("Puzzles: got {} from cache", name),
            Source::Network => tracing::info!("Puzzles: got {}", name),
        }
        Ok(fetched.content)
    }

    /// Downloads an image unless already stored; returns its local path
    pub async fn download_image(&self, image_url: &Url) -> Result<String, CrawlError> {
        let key = url_tail(image_url.as_str());

        let fetched = self
            .images
            .get_or_fetch(key, || self.fetcher.fetch_binary(image_url.as_str()))
            .await?;

        if fetched.source == Source::Network {
            tracing::info!("Images: downloaded {}", key);
        }
        Ok(self.images.path_for(key).display().to_string())
    }
}
