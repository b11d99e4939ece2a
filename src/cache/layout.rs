use crate::cache::ContentCache;
use crate::crawler::RetryPolicy;
use std::path::{Path, PathBuf};

/// Directory tree used by a crawl
///
/// ```text
/// <base>/
///   images/           downloaded product images
///   cache/pages/      listing pages
///   cache/puzzles/    detail documents
///   <timestamp>.csv   exports
///   <timestamp>.sql
/// ```
#[derive(Debug, Clone)]
pub struct StorageLayout {
    base: PathBuf,
}

impl StorageLayout {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn images_dir(&self) -> PathBuf {
        self.base.join("images")
    }

    pub fn pages_dir(&self) -> PathBuf {
        self.base.join("cache").join("pages")
    }

    pub fn puzzles_dir(&self) -> PathBuf {
        self.base.join("cache").join("puzzles")
    }

    /// Creates every directory of the layout that does not exist yet
    pub fn create_all(&self) -> std::io::Result<()> {
        for dir in [self.images_dir(), self.pages_dir(), self.puzzles_dir()] {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(())
    }

    pub fn pages_cache(&self, retry: &RetryPolicy) -> ContentCache {
        ContentCache::new(self.pages_dir(), retry.clone())
    }

    pub fn puzzles_cache(&self, retry: &RetryPolicy) -> ContentCache {
        ContentCache::new(self.puzzles_dir(), retry.clone())
    }

    /// Images are cached in the same directory they are exported from
    pub fn images_cache(&self, retry: &RetryPolicy) -> ContentCache {
        ContentCache::new(self.images_dir(), retry.clone())
    }
}
