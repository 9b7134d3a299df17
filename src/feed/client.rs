//! HTTP client for the storefront JSON feed.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::feed::FeedProduct;

#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    products: Option<Vec<FeedProduct>>,
}

/// Fetches `GET {base}/products.json?limit=N`.
#[derive(Debug, Clone)]
pub struct StorefrontFeed {
    client: reqwest::Client,
    base_url: String,
    limit: u32,
}

impl StorefrontFeed {
    pub fn new(base_url: impl Into<String>, limit: u32, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limit,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.feed_base_url.clone(),
            config.feed_limit,
            Duration::from_secs(config.fetch_timeout),
        )
    }

    /// Every product the feed returns; a body without a product list is empty.
    pub async fn fetch_products(&self) -> Result<Vec<FeedProduct>> {
        let url = format!("{}/products.json", self.base_url);
        debug!("Requesting storefront feed (limit {})", self.limit);

        let response = self
            .client
            .get(&url)
            .query(&[("limit", self.limit)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::UpstreamStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body: FeedResponse = response.json().await?;
        let products = body.products.unwrap_or_default();
        info!("Fetched {} products from storefront feed", products.len());
        Ok(products)
    }
}
