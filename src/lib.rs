//! Storefront Catalog - cached product catalog for storefront listings
//!
//! Fetches the full catalog from the store's REST API behind a two-tier
//! TTL cache and derives filtered, sorted, paginated listing views from it.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod pipeline;

pub use api::AppState;
pub use catalog::ProductCatalogCache;
pub use config::Config;
pub use pipeline::{derive, FilterState};
