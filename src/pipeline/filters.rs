//! Filter State Module
//!
//! User-selected predicates and sort keys for the product listing.
//!
//! Any change to a filter or sort resets the listing to page 1. Setting a
//! value equal to the current one is not a change.

use serde::{Deserialize, Serialize};

/// Category sentinel meaning "no category filter"
pub const ALL_CATEGORIES: &str = "all";

// == Stock Filter ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockFilter {
    #[default]
    All,
    InStock,
    OnSale,
}

impl StockFilter {
    /// Unknown values fall back to `All`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "instock" | "in-stock" => StockFilter::InStock,
            "onsale" | "on-sale" => StockFilter::OnSale,
            _ => StockFilter::All,
        }
    }
}

// == Price Sort ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PriceSort {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "low-high")]
    LowHigh,
    #[serde(rename = "high-low")]
    HighLow,
}

impl PriceSort {
    /// Unknown values fall back to no sort.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "low-high" | "asc" | "price-asc" => PriceSort::LowHigh,
            "high-low" | "desc" | "price-desc" => PriceSort::HighLow,
            _ => PriceSort::None,
        }
    }
}

// == Alpha Sort ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlphaSort {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "a-z")]
    AToZ,
    #[serde(rename = "z-a")]
    ZToA,
}

impl AlphaSort {
    /// Unknown values fall back to no sort.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "a-z" | "asc" => AlphaSort::AToZ,
            "z-a" | "desc" => AlphaSort::ZToA,
            _ => AlphaSort::None,
        }
    }
}

// == Price Range ==
/// Inclusive effective-price bounds, each optional.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Builds a range from raw text bounds; blank or non-numeric text is absent.
    pub fn parse(min: Option<&str>, max: Option<&str>) -> Self {
        Self {
            min: min.and_then(parse_bound),
            max: max.and_then(parse_bound),
        }
    }

    /// Lower bound, if it is a usable number.
    pub fn min(&self) -> Option<f64> {
        self.min.filter(|v| v.is_finite())
    }

    /// Upper bound, if it is a usable number.
    pub fn max(&self) -> Option<f64> {
        self.max.filter(|v| v.is_finite())
    }

    pub fn is_set(&self) -> bool {
        self.min().is_some() || self.max().is_some()
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min().map_or(true, |min| price >= min) && self.max().map_or(true, |max| price <= max)
    }
}

fn parse_bound(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// == Filter State ==
/// Everything the listing view lets a shopper choose, plus the current page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterState {
    search_term: String,
    category: String,
    stock_filter: StockFilter,
    price_range: PriceRange,
    price_sort: PriceSort,
    alpha_sort: AlphaSort,
    page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            category: ALL_CATEGORIES.to_string(),
            stock_filter: StockFilter::All,
            price_range: PriceRange::default(),
            price_sort: PriceSort::None,
            alpha_sort: AlphaSort::None,
            page: 1,
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    // == Accessors ==
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn stock_filter(&self) -> StockFilter {
        self.stock_filter
    }

    pub fn price_range(&self) -> PriceRange {
        self.price_range
    }

    pub fn price_sort(&self) -> PriceSort {
        self.price_sort
    }

    pub fn alpha_sort(&self) -> AlphaSort {
        self.alpha_sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// True when a category other than the sentinel is selected.
    pub fn has_category(&self) -> bool {
        !self.category.eq_ignore_ascii_case(ALL_CATEGORIES)
    }

    // == Setters ==
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.search_term {
            self.search_term = term;
            self.page = 1;
        }
    }

    /// Blank input selects every category.
    pub fn set_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        let category = if category.trim().is_empty() {
            ALL_CATEGORIES.to_string()
        } else {
            category
        };
        if category != self.category {
            self.category = category;
            self.page = 1;
        }
    }

    pub fn set_stock_filter(&mut self, filter: StockFilter) {
        if filter != self.stock_filter {
            self.stock_filter = filter;
            self.page = 1;
        }
    }

    pub fn set_price_range(&mut self, range: PriceRange) {
        if range != self.price_range {
            self.price_range = range;
            self.page = 1;
        }
    }

    pub fn set_price_sort(&mut self, sort: PriceSort) {
        if sort != self.price_sort {
            self.price_sort = sort;
            self.page = 1;
        }
    }

    pub fn set_alpha_sort(&mut self, sort: AlphaSort) {
        if sort != self.alpha_sort {
            self.alpha_sort = sort;
            self.page = 1;
        }
    }

    /// Moves to a page without touching any filter. Page 0 is read as 1.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Resets every filter, both sorts and the page.
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    // == Builders ==
    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.set_search_term(term);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.set_category(category);
        self
    }

    pub fn with_stock_filter(mut self, filter: StockFilter) -> Self {
        self.set_stock_filter(filter);
        self
    }

    pub fn with_price_range(mut self, range: PriceRange) -> Self {
        self.set_price_range(range);
        self
    }

    pub fn with_price_sort(mut self, sort: PriceSort) -> Self {
        self.set_price_sort(sort);
        self
    }

    pub fn with_alpha_sort(mut self, sort: AlphaSort) -> Self {
        self.set_alpha_sort(sort);
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.set_page(page);
        self
    }
}
