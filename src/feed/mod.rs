//! Feed Module
//!
//! The storefront JSON feed behind the secondary listings (new arrivals,
//! most popular). It is separate from the catalog API and is not cached.

mod client;
mod product;
mod views;

pub use client::StorefrontFeed;
pub use product::{FeedImage, FeedProduct, FeedVariant};
pub use views::{
    discount_percentage, feed_categories, filter_by_product_type, most_popular, new_arrivals,
    ALL_PRODUCT_TYPES, NEW_ARRIVALS_TAG, POPULAR_TAGS,
};
