//! Request and Response models for the catalog service API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP query strings and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{FeedQuery, ProductsQuery};
pub use responses::{
    CategoriesResponse, ErrorResponse, FeedListingItem, FeedListingResponse, HealthResponse,
    ProductsResponse, RefreshResponse, StatsResponse,
};
