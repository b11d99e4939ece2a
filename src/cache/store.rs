//! Directory-backed content cache
//!
//! File system failures here are always treated as transient: reads and writes
//! are retried after the policy's backoff until they succeed.

use crate::crawler::{retry_forever, RetryPolicy};
use crate::CrawlError;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Name used when a key would otherwise be empty (a URL ending in `/`)
const EMPTY_KEY_FALLBACK: &str = "index.html";

/// Suffix of in-progress writes; such files are never read as entries
const PARTIAL_SUFFIX: &str = "part";

static PARTIAL_SEQ: AtomicU64 = AtomicU64::new(0);

/// A sibling of `path` unique to this write
fn partial_path(path: &Path) -> PathBuf {
    let seq = PARTIAL_SEQ.fetch_add(1, Ordering::Relaxed);
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.{}.{}", std::process::id(), seq, PARTIAL_SUFFIX));
    path.with_file_name(name)
}

/// Content that can be stored in and restored from the cache
pub trait Payload: Sized {
    fn from_bytes(bytes: Vec<u8>) -> Self;
    fn as_bytes(&self) -> &[u8];
}

impl Payload for String {
    fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }

    fn as_bytes(&self) -> &[u8] {
        self.as_str().as_bytes()
    }
}

impl Payload for Vec<u8> {
    fn from_bytes(bytes: Vec<u8>) -> Self {
        bytes
    }

    fn as_bytes(&self) -> &[u8] {
        self.as_slice()
    }
}

/// Where a piece of content came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Network,
}

/// Content plus its origin, for progress reporting
#[derive(Debug, Clone)]
pub struct Fetched<P> {
    pub content: P,
    pub source: Source,
}

/// A cache rooted at one directory
#[derive(Debug, Clone)]
pub struct ContentCache {
    dir: PathBuf,
    retry: RetryPolicy,
}

impl ContentCache {
    /// Creates a cache over `dir`; the directory must already exist
    pub fn new(dir: impl Into<PathBuf>, retry: RetryPolicy) -> Self {
        Self {
            dir: dir.into(),
            retry,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        if key.is_empty() {
            self.dir.join(EMPTY_KEY_FALLBACK)
        } else {
            self.dir.join(key)
        }
    }

    /// Returns true if an entry for `key` exists
    pub async fn has(&self, key: &str) -> bool {
        tokio::fs::metadata(self.path_for(key))
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    /// Reads an entry as text, retrying on I/O failure
    pub async fn read_text(&self, key: &str) -> Result<String, CrawlError> {
        self.read(key).await
    }

    /// Reads an entry as raw bytes, retrying on I/O failure
    pub async fn read_bytes(&self, key: &str) -> Result<Vec<u8>, CrawlError> {
        self.read(key).await
    }

    /// Stores an entry, retrying on I/O failure
    ///
    /// The content goes to a private sibling file first and is renamed onto
    /// the key, so an entry that `has` reports is always complete.
    pub async fn write(&self, key: &str, content: &[u8]) -> Result<(), CrawlError> {
        let path = self.path_for(key);
        let partial = partial_path(&path);
        let label = format!("write {}", path.display());

        let (path_ref, partial_ref) = (&path, &partial);
        retry_forever(&self.retry, &label, move || async move {
            tokio::fs::write(partial_ref, content).await?;
            tokio::fs::rename(partial_ref, path_ref).await
        })
        .await?;
        Ok(())
    }

    async fn read<P: Payload>(&self, key: &str) -> Result<P, CrawlError> {
        let path = self.path_for(key);
        let label = format!("read {}", path.display());
        let bytes = retry_forever(&self.retry, &label, || tokio::fs::read(&path)).await?;
        Ok(P::from_bytes(bytes))
    }

    /// Returns the cached entry for `key`, or runs `fetch` and caches its result
    ///
    /// A hit is used unconditionally; the network is only touched on a miss.
    /// Errors from `fetch` propagate unchanged.
    pub async fn get_or_fetch<P, F, Fut>(&self, key: &str, fetch: F) -> Result<Fetched<P>, CrawlError>
    where
        P: Payload,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<P, CrawlError>>,
    {
        if self.has(key).await {
            let content = self.read(key).await?;
            return Ok(Fetched {
                content,
                source: Source::Cache,
            });
        }

        let content = fetch().await?;
        self.write(key, content.as_bytes()).await?;
        Ok(Fetched {
            content,
            source: Source::Network,
        })
    }
}
