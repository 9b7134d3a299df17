//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::catalog::MAX_UPSTREAM_PAGE_SIZE;

/// Categories always offered by the storefront, ahead of whatever the catalog carries.
pub const DEFAULT_SEED_CATEGORIES: [&str; 5] = ["Kids", "Boys", "Girls", "Men", "Women"];

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the catalog REST API (`.../wp-json/wc/v3`)
    pub catalog_base_url: String,
    /// Consumer key for basic auth against the catalog API
    pub consumer_key: Option<String>,
    /// Consumer secret for basic auth against the catalog API
    pub consumer_secret: Option<String>,
    /// Items requested per upstream page
    pub per_page: u32,
    /// Catalog snapshot TTL in seconds
    pub cache_ttl: u64,
    /// Client-side timeout for upstream requests in seconds
    pub fetch_timeout: u64,
    /// Directory backing the persisted session tier
    pub session_cache_dir: PathBuf,
    /// Page size of the main product listing
    pub listing_page_size: usize,
    /// Base URL of the storefront JSON feed
    pub feed_base_url: String,
    /// `limit` passed to the feed
    pub feed_limit: u32,
    /// Page size of the secondary feed listings
    pub feed_page_size: usize,
    /// Categories listed before the catalog's own
    pub seed_categories: Vec<String>,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CATALOG_API_BASE_URL` - Catalog REST API base URL
    /// - `CATALOG_CONSUMER_KEY` / `CATALOG_CONSUMER_SECRET` - Basic auth credentials (default: none)
    /// - `CATALOG_PER_PAGE` - Upstream page size, clamped to 1..=100 (default: 100)
    /// - `CATALOG_CACHE_TTL` - Snapshot TTL in seconds (default: 300)
    /// - `FETCH_TIMEOUT` - Upstream timeout in seconds (default: 30)
    /// - `SESSION_CACHE_DIR` - Directory for the persisted tier (default: temp dir)
    /// - `LISTING_PAGE_SIZE` - Main listing page size (default: 12)
    /// - `FEED_BASE_URL` - Storefront feed base URL
    /// - `FEED_LIMIT` - Feed item limit (default: 5000)
    /// - `FEED_PAGE_SIZE` - Secondary listing page size (default: 10)
    /// - `SEED_CATEGORIES` - Comma-separated seed categories
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            catalog_base_url: env::var("CATALOG_API_BASE_URL")
                .unwrap_or(defaults.catalog_base_url),
            consumer_key: env::var("CATALOG_CONSUMER_KEY").ok().filter(|v| !v.is_empty()),
            consumer_secret: env::var("CATALOG_CONSUMER_SECRET")
                .ok()
                .filter(|v| !v.is_empty()),
            per_page: parse_var("CATALOG_PER_PAGE", defaults.per_page)
                .clamp(1, MAX_UPSTREAM_PAGE_SIZE),
            cache_ttl: parse_var("CATALOG_CACHE_TTL", defaults.cache_ttl),
            fetch_timeout: parse_var("FETCH_TIMEOUT", defaults.fetch_timeout),
            session_cache_dir: env::var("SESSION_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_cache_dir),
            listing_page_size: parse_var("LISTING_PAGE_SIZE", defaults.listing_page_size).max(1),
            feed_base_url: env::var("FEED_BASE_URL").unwrap_or(defaults.feed_base_url),
            feed_limit: parse_var("FEED_LIMIT", defaults.feed_limit),
            feed_page_size: parse_var("FEED_PAGE_SIZE", defaults.feed_page_size).max(1),
            seed_categories: env::var("SEED_CATEGORIES")
                .map(|v| parse_list(&v))
                .unwrap_or(defaults.seed_categories),
            server_port: parse_var("SERVER_PORT", defaults.server_port),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_base_url: "https://ambalafoods.crea8ive.solutions/wp-json/wc/v3".to_string(),
            consumer_key: None,
            consumer_secret: None,
            per_page: MAX_UPSTREAM_PAGE_SIZE,
            cache_ttl: 300,
            fetch_timeout: 30,
            session_cache_dir: env::temp_dir(),
            listing_page_size: 12,
            feed_base_url: "https://cocobee.com.pk".to_string(),
            feed_limit: 5000,
            feed_page_size: 10,
            seed_categories: DEFAULT_SEED_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            server_port: 3000,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
