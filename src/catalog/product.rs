//! Product Module
//!
//! The normalized product record and the coercions applied to raw catalog
//! API records on ingestion.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Product Id ==
/// Opaque product identifier; the catalog API uses integers, other feeds strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Int(id) => write!(f, "{}", id),
            ProductId::Text(id) => f.write_str(id),
        }
    }
}

// == Product ==
/// A catalog product after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Base price, never negative
    pub price: f64,
    /// Discounted price; only kept when positive
    pub sale_price: Option<f64>,
    /// Backend stock status (`instock`, `outofstock`, ...)
    pub stock_status: String,
    /// Category labels in upstream order
    #[serde(default)]
    pub categories: Vec<String>,
    /// Image URLs, primary first
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// Normalizes a raw catalog record.
    ///
    /// Returns `None` when the record is not an object or carries no usable id.
    pub fn from_record(record: &Value) -> Option<Self> {
        let obj = record.as_object()?;
        let id = obj.get("id").and_then(coerce_id)?;

        Some(Self {
            id,
            name: obj.get("name").map(coerce_string).unwrap_or_default(),
            price: obj.get("price").and_then(coerce_number).unwrap_or(0.0).max(0.0),
            sale_price: obj
                .get("sale_price")
                .and_then(coerce_number)
                .filter(|p| *p > 0.0),
            stock_status: obj.get("stock_status").map(coerce_string).unwrap_or_default(),
            categories: labels(obj.get("categories"), "name"),
            images: labels(obj.get("images"), "src"),
        })
    }

    /// Sale price when it undercuts the base price, else the base price.
    pub fn effective_price(&self) -> f64 {
        match self.sale_price {
            Some(sale) if sale < self.price => sale,
            _ => self.price,
        }
    }

    /// True when a sale price is set below the base price.
    pub fn is_on_sale(&self) -> bool {
        matches!(self.sale_price, Some(sale) if sale < self.price)
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock_status == "instock"
    }

    /// Case-insensitive category membership.
    pub fn has_category(&self, label: &str) -> bool {
        let wanted = label.to_lowercase();
        self.categories.iter().any(|c| c.to_lowercase() == wanted)
    }
}

// == Coercions ==
fn coerce_id(value: &Value) -> Option<ProductId> {
    match value {
        Value::Number(n) => n.as_i64().map(ProductId::Int),
        Value::String(s) if !s.trim().is_empty() => Some(ProductId::Text(s.clone())),
        _ => None,
    }
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numbers pass through; numeric strings are parsed; anything else is absent.
fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Pulls display labels out of a list of strings or objects keyed by `field`.
fn labels(value: Option<&Value>, field: &str) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj.get(field).and_then(Value::as_str).map(str::to_string),
            _ => None,
        })
        .filter(|label| !label.is_empty())
        .collect()
}
