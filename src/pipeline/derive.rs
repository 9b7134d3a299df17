//! Derive Module
//!
//! Turns a catalog snapshot and a filter state into one page of products
//! plus the aggregates the listing shows next to it.

use std::cmp::Ordering;

use serde::Serialize;

use crate::catalog::Product;
use crate::pipeline::filters::{AlphaSort, FilterState, PriceSort, StockFilter};
use crate::pipeline::pagination::{page_bounds, paginate, total_pages};

// == Price Stats ==
/// Effective-price extremes across the whole, unfiltered catalog.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PriceStats {
    pub min: f64,
    pub max: f64,
}

impl PriceStats {
    /// Zero for an empty catalog.
    pub fn from_catalog(catalog: &[Product]) -> Self {
        let mut prices = catalog.iter().map(Product::effective_price);
        let Some(first) = prices.next() else {
            return Self::default();
        };

        prices.fold(Self { min: first, max: first }, |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        })
    }
}

// == Derived View ==
/// One page of the filtered, sorted catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedView {
    pub items: Vec<Product>,
    /// 1-based page the items belong to
    pub page: usize,
    pub page_size: usize,
    /// Products surviving the filters
    pub filtered_count: usize,
    /// 0 when nothing survives the filters
    pub total_pages: usize,
    pub index_of_first: usize,
    pub index_of_last: usize,
    pub active_filters_count: usize,
    pub price_stats: PriceStats,
}

// == Derive ==
/// Filters, sorts and paginates `catalog`. Never fails; requesting a page
/// past the end yields no items.
pub fn derive(catalog: &[Product], filters: &FilterState, page_size: usize) -> DerivedView {
    let filtered = filter_and_sort(catalog, filters);
    let page = filters.page().max(1);
    let (index_of_first, index_of_last) = page_bounds(page, page_size);

    DerivedView {
        items: paginate(&filtered, page, page_size),
        page,
        page_size,
        filtered_count: filtered.len(),
        total_pages: total_pages(filtered.len(), page_size),
        index_of_first,
        index_of_last,
        active_filters_count: active_filters_count(filters),
        price_stats: PriceStats::from_catalog(catalog),
    }
}

/// The full filtered and sorted list, before pagination.
///
/// When both sorts are set, the price sort runs first and the name sort is
/// applied over it, so name order wins.
pub fn filter_and_sort(catalog: &[Product], filters: &FilterState) -> Vec<Product> {
    let needle = filters.search_term().to_lowercase();
    let range = filters.price_range();

    let mut result: Vec<Product> = catalog
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .filter(|p| !filters.has_category() || p.has_category(filters.category()))
        .filter(|p| match filters.stock_filter() {
            StockFilter::All => true,
            StockFilter::InStock => p.is_in_stock(),
            StockFilter::OnSale => p.is_on_sale(),
        })
        .filter(|p| range.contains(p.effective_price()))
        .cloned()
        .collect();

    match filters.price_sort() {
        PriceSort::LowHigh => {
            result.sort_by(|a, b| a.effective_price().total_cmp(&b.effective_price()))
        }
        PriceSort::HighLow => {
            result.sort_by(|a, b| b.effective_price().total_cmp(&a.effective_price()))
        }
        PriceSort::None => {}
    }

    match filters.alpha_sort() {
        AlphaSort::AToZ => result.sort_by(|a, b| collate(&a.name, &b.name)),
        AlphaSort::ZToA => result.sort_by(|a, b| collate(&b.name, &a.name)),
        AlphaSort::None => {}
    }

    result
}

/// Case-insensitive name order; names equal but for case put lowercase first.
/// Accented letters sort by code point, not by locale rules.
fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

// == Active Filters ==
/// Number of non-default filter groups; each group counts at most once.
pub fn active_filters_count(filters: &FilterState) -> usize {
    [
        !filters.search_term().is_empty(),
        filters.price_sort() != PriceSort::None,
        filters.alpha_sort() != AlphaSort::None,
        filters.has_category(),
        filters.stock_filter() != StockFilter::All,
        filters.price_range().is_set(),
    ]
    .iter()
    .filter(|active| **active)
    .count()
}

// == Categories ==
/// Category choices for the listing: `seed` first, then every catalog
/// category label in first-seen order, without duplicates.
pub fn catalog_categories(catalog: &[Product], seed: &[String]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    let labels = seed
        .iter()
        .chain(catalog.iter().flat_map(|p| p.categories.iter()));

    for label in labels {
        if !categories.contains(label) {
            categories.push(label.clone());
        }
    }
    categories
}
