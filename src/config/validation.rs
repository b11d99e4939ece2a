use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the catalog description
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.host_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid host_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "host_url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(format!(
            "host_url '{}' cannot be used as a base URL",
            config.host_url
        )));
    }

    validate_start_page(&config.start_page)?;

    if config.excluded_marker.trim().is_empty() {
        return Err(ConfigError::Validation(
            "excluded_marker cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// The start page names both the listing URL and the page cache files
fn validate_start_page(start_page: &str) -> Result<(), ConfigError> {
    if start_page.is_empty() {
        return Err(ConfigError::Validation(
            "start_page cannot be empty".to_string(),
        ));
    }

    if start_page.contains(['/', '?', '#']) {
        return Err(ConfigError::Validation(format!(
            "start_page must be a single path segment without query, got '{}'",
            start_page
        )));
    }

    Ok(())
}

/// Validates network configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_connections < 1 || config.max_connections > 100 {
        return Err(ConfigError::Validation(format!(
            "max_connections must be between 1 and 100, got {}",
            config.max_connections
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.base_directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "base_directory cannot be empty".to_string(),
        ));
    }

    validate_table_name(&config.table_name)?;

    if config.csv_separator.is_empty() {
        return Err(ConfigError::Validation(
            "csv_separator cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Table names are written unquoted into the SQL export
fn validate_table_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(
            "table_name cannot be empty".to_string(),
        ));
    }

    if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(ConfigError::Validation(format!(
            "table_name must contain only alphanumeric characters and underscores, got '{}'",
            name
        )));
    }

    Ok(())
}
