//! Feed product records as the storefront feed returns them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::catalog::ProductId;
use crate::feed::discount_percentage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedProduct {
    pub id: ProductId,
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub handle: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub vendor: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub product_type: String,
    #[serde(default, deserialize_with = "tag_list")]
    pub tags: Vec<String>,
    /// RFC 3339 creation time, kept as text so one bad stamp can't sink the feed
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub variants: Vec<FeedVariant>,
    #[serde(default)]
    pub images: Vec<FeedImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedVariant {
    #[serde(default, deserialize_with = "price")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "price")]
    pub compare_at_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedImage {
    pub src: String,
}

impl FeedProduct {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn first_variant(&self) -> Option<&FeedVariant> {
        self.variants.first()
    }

    /// Whole-percent discount of the first variant; 0 without one.
    pub fn discount_percentage(&self) -> u32 {
        self.first_variant()
            .map(|v| discount_percentage(v.price, v.compare_at_price))
            .unwrap_or(0)
    }

    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(|img| img.src.as_str())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Tags arrive either as a list or as one comma-separated string.
fn tag_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let tags = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Value::String(s) => s.split(',').map(|t| t.trim().to_string()).collect(),
        _ => Vec::new(),
    };
    Ok(tags.into_iter().filter(|t: &String| !t.is_empty()).collect())
}

/// Prices arrive as decimal strings or numbers; anything else is absent.
fn price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_feed_product() {
        let raw = json!({
            "id": 8812,
            "title": "Summer Frock",
            "handle": "summer-frock",
            "vendor": null,
            "product_type": "Frocks",
            "tags": ["New Arrivals", "Girls"],
            "created_at": "2024-05-01T10:00:00+05:00",
            "variants": [{"price": "1500.00", "compare_at_price": "2000.00"}],
            "images": [{"src": "https://cdn/frock.jpg"}]
        });

        let product: FeedProduct = serde_json::from_value(raw).unwrap();
        assert_eq!(product.id, ProductId::Int(8812));
        assert_eq!(product.vendor, "");
        assert!(product.has_tag("New Arrivals"));
        assert_eq!(product.first_variant().unwrap().price, Some(1500.0));
        assert_eq!(product.primary_image(), Some("https://cdn/frock.jpg"));
        assert_eq!(product.discount_percentage(), 25);
        assert_eq!(
            product.created_at_utc().unwrap().to_rfc3339(),
            "2024-05-01T05:00:00+00:00"
        );
    }

    #[test]
    fn test_comma_separated_tags() {
        let product: FeedProduct =
            serde_json::from_value(json!({"id": 1, "tags": "Best Seller, Boys,"})).unwrap();
        assert_eq!(product.tags, vec!["Best Seller", "Boys"]);
    }

    #[test]
    fn test_sparse_record_defaults() {
        let product: FeedProduct = serde_json::from_value(json!({"id": "abc"})).unwrap();
        assert!(product.tags.is_empty());
        assert!(product.first_variant().is_none());
        assert_eq!(product.discount_percentage(), 0);
        assert!(product.created_at_utc().is_none());
    }

    #[test]
    fn test_bad_timestamp_is_absent() {
        let product: FeedProduct =
            serde_json::from_value(json!({"id": 1, "created_at": "yesterday"})).unwrap();
        assert!(product.created_at_utc().is_none());
    }
}
