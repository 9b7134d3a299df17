//! Scripted catalog source for cache tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::catalog::{CatalogPage, CatalogSource};
use crate::error::{CatalogError, Result};

/// Builds a raw catalog record the way the catalog API shapes them.
pub fn record(id: i64, name: &str, price: f64, sale: Option<f64>, stock: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "price": price.to_string(),
        "sale_price": sale.map(|s| s.to_string()).unwrap_or_default(),
        "stock_status": stock,
        "categories": [],
        "images": []
    })
}

/// Serves fixed pages, advertising `pages.len()` as the total.
pub struct ScriptedSource {
    pages: Vec<Vec<Value>>,
    delay: Option<Duration>,
    /// Item total to advertise instead of the real one
    advertised_items: Option<u64>,
    /// Page number that fails, 0 = none
    fail_on: AtomicU32,
    calls: AtomicU32,
    requested: Mutex<Vec<u32>>,
    per_page: Mutex<Option<u32>>,
}

impl ScriptedSource {
    pub fn new(pages: Vec<Vec<Value>>) -> Self {
        Self {
            pages,
            delay: None,
            advertised_items: None,
            fail_on: AtomicU32::new(0),
            calls: AtomicU32::new(0),
            requested: Mutex::new(Vec::new()),
            per_page: Mutex::new(None),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_advertised_items(mut self, total: u64) -> Self {
        self.advertised_items = Some(total);
        self
    }

    pub fn fail_on_page(&self, page: u32) {
        self.fail_on.store(page, Ordering::SeqCst);
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }

    pub fn requested_per_page(&self) -> Option<u32> {
        *self.per_page.lock().unwrap()
    }
}

#[async_trait]
impl CatalogSource for ScriptedSource {
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<CatalogPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(page);
        *self.per_page.lock().unwrap() = Some(per_page);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_on.load(Ordering::SeqCst) == page {
            return Err(CatalogError::Fetch(format!("page {} unavailable", page)));
        }

        let records = self
            .pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_default();

        Ok(CatalogPage {
            records,
            total_pages: self.pages.len() as u32,
            total_items: Some(
                self.advertised_items
                    .unwrap_or_else(|| self.pages.iter().map(Vec::len).sum::<usize>() as u64),
            ),
        })
    }
}
