//! Pipeline Module
//!
//! Pure derivation of a filtered, sorted, paginated view of the catalog.

mod derive;
mod filters;
mod pagination;


pub use derive::{
    active_filters_count, catalog_categories, derive, filter_and_sort, DerivedView, PriceStats,
};
pub use filters::{AlphaSort, FilterState, PriceRange, PriceSort, StockFilter, ALL_CATEGORIES};
pub use pagination::{page_bounds, page_links, paginate, total_pages, PageLink};

/// Page size of the main product listing
pub const LISTING_PAGE_SIZE: usize = 12;

/// Page size of the secondary feed listings
pub const SECONDARY_PAGE_SIZE: usize = 10;
