//! Request DTOs for the catalog service API
//!
//! Query strings are parsed leniently: a value that cannot be understood
//! leaves its filter at the default instead of failing the request.

use serde::Deserialize;

use crate::pipeline::{AlphaSort, FilterState, PriceRange, PriceSort, StockFilter};

/// Query string for `GET /products`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductsQuery {
    /// Case-insensitive name substring
    pub search: Option<String>,
    /// Category label or `all`
    pub category: Option<String>,
    /// `all`, `instock` or `onsale`
    pub stock: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    /// `low-high` or `high-low`
    pub price_sort: Option<String>,
    /// `a-z` or `z-a`
    pub alpha_sort: Option<String>,
    /// 1-based page number
    pub page: Option<String>,
}

impl ProductsQuery {
    /// Builds the filter state this query asks for.
    pub fn to_filter_state(&self) -> FilterState {
        let mut filters = FilterState::new();

        if let Some(search) = &self.search {
            filters.set_search_term(search.as_str());
        }
        if let Some(category) = &self.category {
            filters.set_category(category.as_str());
        }
        if let Some(stock) = &self.stock {
            filters.set_stock_filter(StockFilter::parse(stock));
        }
        filters.set_price_range(PriceRange::parse(
            self.min_price.as_deref(),
            self.max_price.as_deref(),
        ));
        if let Some(sort) = &self.price_sort {
            filters.set_price_sort(PriceSort::parse(sort));
        }
        if let Some(sort) = &self.alpha_sort {
            filters.set_alpha_sort(AlphaSort::parse(sort));
        }

        // Page last, so filter setters don't reset it
        filters.set_page(parse_page(self.page.as_deref()));
        filters
    }
}

/// Query string for the feed listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedQuery {
    /// Product type or `All`
    pub category: Option<String>,
    pub page: Option<String>,
}

impl FeedQuery {
    pub fn page(&self) -> usize {
        parse_page(self.page.as_deref())
    }

    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or_default()
    }
}

/// Missing, zero or non-numeric pages read as page 1.
fn parse_page(raw: Option<&str>) -> usize {
    raw.and_then(|p| p.trim().parse::<usize>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}
