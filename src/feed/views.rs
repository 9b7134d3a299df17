//! Secondary listing views derived from the storefront feed.

use std::cmp::Ordering;

use crate::feed::FeedProduct;

/// Tag marking new-arrival products
pub const NEW_ARRIVALS_TAG: &str = "New Arrivals";

/// Tags (compared lowercased) marking popular products
pub const POPULAR_TAGS: [&str; 4] = ["best seller", "bestseller", "most popular", "popular"];

/// Product-type sentinel meaning "every type"
pub const ALL_PRODUCT_TYPES: &str = "All";

/// Products tagged as new arrivals, newest first.
pub fn new_arrivals(products: &[FeedProduct]) -> Vec<FeedProduct> {
    let mut result: Vec<FeedProduct> = products
        .iter()
        .filter(|p| p.has_tag(NEW_ARRIVALS_TAG))
        .cloned()
        .collect();
    sort_newest_first(&mut result);
    result
}

/// Products carrying a popularity tag, newest first. Falls back to the
/// whole feed, newest first, when nothing is tagged.
pub fn most_popular(products: &[FeedProduct]) -> Vec<FeedProduct> {
    let mut result: Vec<FeedProduct> = products
        .iter()
        .filter(|p| {
            p.tags
                .iter()
                .any(|t| POPULAR_TAGS.contains(&t.to_lowercase().as_str()))
        })
        .cloned()
        .collect();

    if result.is_empty() {
        result = products.to_vec();
    }
    sort_newest_first(&mut result);
    result
}

/// `"All"` followed by each non-empty product type in first-seen order.
pub fn feed_categories(products: &[FeedProduct]) -> Vec<String> {
    let mut categories = vec![ALL_PRODUCT_TYPES.to_string()];
    for product in products {
        if !product.product_type.is_empty() && !categories.contains(&product.product_type) {
            categories.push(product.product_type.clone());
        }
    }
    categories
}

pub fn filter_by_product_type(products: &[FeedProduct], product_type: &str) -> Vec<FeedProduct> {
    if product_type.trim().is_empty() || product_type.eq_ignore_ascii_case(ALL_PRODUCT_TYPES) {
        return products.to_vec();
    }
    products
        .iter()
        .filter(|p| p.product_type == product_type)
        .cloned()
        .collect()
}

/// Whole-percent discount of `price` against `compare_at`; 0 when there is
/// no higher compare-at price.
pub fn discount_percentage(price: Option<f64>, compare_at: Option<f64>) -> u32 {
    match (price, compare_at) {
        (Some(price), Some(compare_at)) if compare_at > price && compare_at > 0.0 => {
            ((1.0 - price / compare_at) * 100.0).round() as u32
        }
        _ => 0,
    }
}

/// Undated products go last; the sort is stable.
fn sort_newest_first(products: &mut [FeedProduct]) {
    products.sort_by(|a, b| match (a.created_at_utc(), b.created_at_utc()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
