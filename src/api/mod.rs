//! API Module
//!
//! HTTP handlers and routing for the catalog service.
//!
//! # Endpoints
//! - `GET /products` - Filtered, sorted page of the catalog
//! - `GET /categories` - Category choices for the listing
//! - `GET /new-arrivals` - Feed products tagged as new arrivals
//! - `GET /most-popular` - Feed products tagged as popular
//! - `POST /refresh` - Drop the cache and refetch the catalog
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
