use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for the puzzle crawler
///
/// Every section and key has a default, so an empty file (or no file at all)
/// describes a crawl of the stock catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The catalog being crawled
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Root URL of the catalog host, with trailing slash
    #[serde(rename = "host-url")]
    pub host_url: String,

    /// Listing page relative to the host; paginated with `?page=N`
    #[serde(rename = "start-page")]
    pub start_page: String,

    /// Human-readable name of the catalog section
    #[serde(rename = "catalog-name")]
    pub catalog_name: String,

    /// Marker identifying the excluded 3-D subtype in URLs and titles
    #[serde(rename = "excluded-marker")]
    pub excluded_marker: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            host_url: "https://hobby-puzzle.ru/".to_string(),
            start_page: "proizvoditeli.html".to_string(),
            catalog_name: "Производители".to_string(),
            excluded_marker: "3d".to_string(),
        }
    }
}

/// Network behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of simultaneous requests to the host
    #[serde(rename = "max-connections")]
    pub max_connections: u32,

    /// Fixed delay between attempts of a failed transient operation (milliseconds)
    #[serde(rename = "retry-backoff-ms")]
    pub retry_backoff_ms: u64,

    /// Per-request timeout; expiry counts as a transient failure
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Skip TLS certificate verification (the catalog host needs this)
    #[serde(rename = "accept-invalid-certs")]
    pub accept_invalid_certs: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            retry_backoff_ms: 1000,
            request_timeout_secs: 300,
            accept_invalid_certs: true,
        }
    }
}

impl CrawlerConfig {
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding images, the cache, and the export files
    #[serde(rename = "base-directory")]
    pub base_directory: PathBuf,

    /// Table name used in the SQL export
    #[serde(rename = "table-name")]
    pub table_name: String,

    /// Field separator used in the CSV export
    #[serde(rename = "csv-separator")]
    pub csv_separator: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_directory: default_base_directory(),
            table_name: "table_name".to_string(),
            csv_separator: ";".to_string(),
        }
    }
}

/// `$HOME/PuzzlesParser`, or `./PuzzlesParser` when no home is set
fn default_base_directory() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("PuzzlesParser")
}
