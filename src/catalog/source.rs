//! Catalog Source Module
//!
//! Upstream access to the paginated catalog API. A source returns one page
//! per call; walking the pages is the cache's job.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{CatalogError, Result};

/// Header carrying the number of pages the catalog spans
pub const TOTAL_PAGES_HEADER: &str = "x-wp-totalpages";

/// Header carrying the number of items the catalog holds
pub const TOTAL_ITEMS_HEADER: &str = "x-wp-total";

// == Catalog Page ==
/// One page of raw catalog records plus the server's pagination metadata.
#[derive(Debug, Clone, Default)]
pub struct CatalogPage {
    pub records: Vec<Value>,
    /// Pages advertised by the server
    pub total_pages: u32,
    /// Items advertised by the server, when reported
    pub total_items: Option<u64>,
}

// == Catalog Source Trait ==
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches page `page` (1-based) holding up to `per_page` records.
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<CatalogPage>;
}

// == Woo Catalog Source ==
/// Catalog source backed by the store's `/products` REST endpoint.
#[derive(Debug, Clone)]
pub struct WooCatalogSource {
    client: reqwest::Client,
    base_url: String,
    credentials: Option<(String, String)>,
}

impl WooCatalogSource {
    /// Builds a source with the given base URL and request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials: None,
        })
    }

    /// Builds a source from configuration, with basic auth when both
    /// consumer key and secret are set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = Self::new(
            config.catalog_base_url.clone(),
            Duration::from_secs(config.fetch_timeout),
        )?;

        Ok(match (&config.consumer_key, &config.consumer_secret) {
            (Some(key), Some(secret)) => source.with_credentials(key, secret),
            _ => source,
        })
    }

    pub fn with_credentials(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.credentials = Some((key.into(), secret.into()));
        self
    }
}

#[async_trait]
impl CatalogSource for WooCatalogSource {
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<CatalogPage> {
        let url = format!("{}/products", self.base_url);
        debug!("Requesting catalog page {} ({} per page)", page, per_page);

        let mut request = self
            .client
            .get(&url)
            .query(&[("per_page", per_page), ("page", page)]);
        if let Some((key, secret)) = &self.credentials {
            request = request.basic_auth(key, Some(secret));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::UpstreamStatus {
                status: status.as_u16(),
                url,
            });
        }

        let total_pages = parse_total_pages(response.headers())?;
        let total_items = header_str(response.headers(), TOTAL_ITEMS_HEADER)
            .and_then(|v| v.parse::<u64>().ok());

        let body: Value = response.json().await?;
        let Value::Array(records) = body else {
            return Err(CatalogError::Malformed(format!(
                "expected a list of products on page {}",
                page
            )));
        };

        Ok(CatalogPage {
            records,
            total_pages,
            total_items,
        })
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
}

/// Reads the advertised page count. A missing header means a single page;
/// a fractional count rounds up; anything unparseable is malformed.
pub fn parse_total_pages(headers: &HeaderMap) -> Result<u32> {
    let Some(raw) = header_str(headers, TOTAL_PAGES_HEADER) else {
        return Ok(1);
    };

    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 && n <= u32::MAX as f64 => Ok(n.ceil() as u32),
        _ => Err(CatalogError::Malformed(format!(
            "invalid {} header: {:?}",
            TOTAL_PAGES_HEADER, raw
        ))),
    }
}
