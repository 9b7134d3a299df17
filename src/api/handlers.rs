//! API Handlers
//!
//! HTTP request handlers for each catalog service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use tracing::warn;

use crate::catalog::{Product, ProductCatalogCache};
use crate::config::Config;
use crate::error::Result;
use crate::feed::{
    feed_categories, filter_by_product_type, most_popular, new_arrivals, StorefrontFeed,
};
use crate::models::{
    CategoriesResponse, FeedListingResponse, FeedQuery, HealthResponse, ProductsQuery,
    ProductsResponse, RefreshResponse, StatsResponse,
};
use crate::pipeline::{catalog_categories, derive, LISTING_PAGE_SIZE, SECONDARY_PAGE_SIZE};

/// Shown alongside an older snapshot when a refresh failed
pub const STALE_CATALOG_NOTICE: &str =
    "Failed to load the latest products; showing previously loaded products";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Catalog cache shared by every request
    pub catalog: Arc<ProductCatalogCache>,
    /// Storefront feed for the secondary listings
    pub feed: Arc<StorefrontFeed>,
    pub listing_page_size: usize,
    pub feed_page_size: usize,
    /// Categories offered ahead of the catalog's own
    pub seed_categories: Arc<Vec<String>>,
}

impl AppState {
    /// Creates a new AppState with default page sizes and no seed categories.
    pub fn new(catalog: ProductCatalogCache, feed: StorefrontFeed) -> Self {
        Self {
            catalog: Arc::new(catalog),
            feed: Arc::new(feed),
            listing_page_size: LISTING_PAGE_SIZE,
            feed_page_size: SECONDARY_PAGE_SIZE,
            seed_categories: Arc::new(Vec::new()),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = ProductCatalogCache::from_config(config)?;
        let feed = StorefrontFeed::from_config(config)?;

        Ok(Self {
            listing_page_size: config.listing_page_size,
            feed_page_size: config.feed_page_size,
            seed_categories: Arc::new(config.seed_categories.clone()),
            ..Self::new(catalog, feed)
        })
    }

    pub fn with_seed_categories(mut self, seed: Vec<String>) -> Self {
        self.seed_categories = Arc::new(seed);
        self
    }

    /// Current catalog, falling back to the last snapshot with a notice when
    /// a refresh fails and one exists.
    async fn load_catalog(&self) -> Result<(Arc<Vec<Product>>, Option<String>)> {
        match self.catalog.get_catalog().await {
            Ok(catalog) => Ok((catalog, None)),
            Err(e) if e.is_fetch_error() => match self.catalog.last_snapshot().await {
                Some(entry) => {
                    warn!("Serving previous catalog snapshot: {}", e);
                    Ok((entry.data, Some(STALE_CATALOG_NOTICE.to_string())))
                }
                None => Err(e),
            },
            Err(e) => Err(e),
        }
    }
}

/// Handler for GET /products
///
/// Returns one page of the filtered, sorted catalog.
pub async fn products_handler(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<ProductsResponse>> {
    let filters = query.to_filter_state();
    let (catalog, notice) = state.load_catalog().await?;

    let view = derive(&catalog, &filters, state.listing_page_size);
    Ok(Json(ProductsResponse::from_view(view, notice)))
}

/// Handler for GET /categories
pub async fn categories_handler(State(state): State<AppState>) -> Result<Json<CategoriesResponse>> {
    let (catalog, _) = state.load_catalog().await?;

    Ok(Json(CategoriesResponse {
        categories: catalog_categories(&catalog, &state.seed_categories),
    }))
}

/// Handler for GET /new-arrivals
///
/// Feed products tagged as new arrivals, optionally narrowed to one product type.
pub async fn new_arrivals_handler(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedListingResponse>> {
    let products = state.feed.fetch_products().await?;
    let arrivals = new_arrivals(&products);
    let categories = feed_categories(&arrivals);
    let listing = filter_by_product_type(&arrivals, query.category());

    Ok(Json(FeedListingResponse::new(
        &listing,
        categories,
        query.page(),
        state.feed_page_size,
    )))
}

/// Handler for GET /most-popular
pub async fn most_popular_handler(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedListingResponse>> {
    let products = state.feed.fetch_products().await?;
    let listing = most_popular(&products);

    Ok(Json(FeedListingResponse::new(
        &listing,
        Vec::new(),
        query.page(),
        state.feed_page_size,
    )))
}

/// Handler for POST /refresh
///
/// Fetches the catalog again. A failed refresh leaves the current snapshot
/// in place for later requests.
pub async fn refresh_handler(State(state): State<AppState>) -> Result<Json<RefreshResponse>> {
    let catalog = state.catalog.force_refresh().await?;

    Ok(Json(RefreshResponse::new(catalog.len())))
}

/// Handler for DELETE /cache
///
/// Drops both cache tiers; the next catalog request goes to the network.
pub async fn invalidate_handler(State(state): State<AppState>) -> StatusCode {
    state.catalog.invalidate().await;
    StatusCode::NO_CONTENT
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(state.catalog.stats().await))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
