//! Catalog Module
//!
//! Serves the full, normalized product catalog from a two-tier cache
//! (process memory, then persisted session) in front of the catalog API.

mod clock;
mod entry;
mod product;
mod session;
mod source;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;
#[cfg(test)]
pub(crate) mod test_support;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{CatalogEntry, PersistedEntry};
pub use product::{Product, ProductId};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
pub use source::{CatalogPage, CatalogSource, WooCatalogSource};
pub use stats::CacheStats;
pub use store::ProductCatalogCache;

// == Public Constants ==
/// Key under which the persisted tier stores the catalog snapshot
pub const SESSION_CACHE_KEY: &str = "ag_products_cache_v1";

/// Default snapshot time-to-live in milliseconds
pub const DEFAULT_TTL_MS: u64 = 5 * 60 * 1000;

/// Largest page size the catalog API accepts
pub const MAX_UPSTREAM_PAGE_SIZE: u32 = 100;
