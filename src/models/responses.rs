//! Response DTOs for the catalog service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::catalog::{CacheStats, Product};
use crate::feed::FeedProduct;
use crate::pipeline::{page_links, paginate, total_pages, DerivedView, PageLink, PriceStats};

/// Response body for `GET /products`
#[derive(Debug, Clone, Serialize)]
pub struct ProductsResponse {
    /// Products on the requested page
    pub products: Vec<Product>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    /// Products matching the filters across all pages
    pub total_count: usize,
    pub index_of_first: usize,
    pub index_of_last: usize,
    pub active_filters_count: usize,
    /// Price extremes over the whole catalog
    pub price_stats: PriceStats,
    pub page_links: Vec<PageLink>,
    /// Set when the listing comes from an older snapshot after a failed refresh
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl ProductsResponse {
    pub fn from_view(view: DerivedView, notice: Option<String>) -> Self {
        Self {
            page_links: page_links(view.page, view.total_pages),
            products: view.items,
            page: view.page,
            page_size: view.page_size,
            total_pages: view.total_pages,
            total_count: view.filtered_count,
            index_of_first: view.index_of_first,
            index_of_last: view.index_of_last,
            active_filters_count: view.active_filters_count,
            price_stats: view.price_stats,
            notice,
        }
    }
}

/// Response body for `GET /categories`
#[derive(Debug, Clone, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// One card of a feed listing: the feed product plus display helpers.
#[derive(Debug, Clone, Serialize)]
pub struct FeedListingItem {
    #[serde(flatten)]
    pub product: FeedProduct,
    pub image: Option<String>,
    /// Percent off the compare-at price, 0 when not discounted
    pub discount_percentage: u32,
}

impl From<FeedProduct> for FeedListingItem {
    fn from(product: FeedProduct) -> Self {
        Self {
            image: product.primary_image().map(str::to_string),
            discount_percentage: product.discount_percentage(),
            product,
        }
    }
}

/// Response body for the feed listings (`GET /new-arrivals`, `GET /most-popular`)
#[derive(Debug, Clone, Serialize)]
pub struct FeedListingResponse {
    pub products: Vec<FeedListingItem>,
    /// Product types to filter by, when the listing offers them
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub page_links: Vec<PageLink>,
}

impl FeedListingResponse {
    /// Paginates `listing` and wraps the requested page.
    pub fn new(listing: &[FeedProduct], categories: Vec<String>, page: usize, page_size: usize) -> Self {
        let total_pages = total_pages(listing.len(), page_size);
        Self {
            products: paginate(listing, page, page_size)
                .into_iter()
                .map(FeedListingItem::from)
                .collect(),
            categories,
            page,
            page_size,
            total_pages,
            total_count: listing.len(),
            page_links: page_links(page, total_pages),
        }
    }
}

/// Response body for `POST /refresh`
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    pub message: String,
    pub total_products: usize,
}

impl RefreshResponse {
    pub fn new(total_products: usize) -> Self {
        Self {
            message: format!("Catalog refreshed with {} products", total_products),
            total_products,
        }
    }
}

/// Response body for the stats endpoint (`GET /stats`)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Share of requests served without a network refresh
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
        }
    }
}

/// Response body for the health endpoint (`GET /health`)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
