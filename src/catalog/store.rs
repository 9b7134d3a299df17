//! Catalog Store Module
//!
//! Two-tier catalog cache: a fresh in-memory snapshot wins, then a fresh
//! persisted snapshot, then a full sequential walk of the upstream pages.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::catalog::{
    CacheStats, CatalogEntry, CatalogSource, Clock, FileSessionStore, Product, SessionStore,
    SystemClock, WooCatalogSource, DEFAULT_TTL_MS, MAX_UPSTREAM_PAGE_SIZE, SESSION_CACHE_KEY,
};
use crate::config::Config;
use crate::error::Result;

/// Mutable part of the cache, guarded by one lock.
#[derive(Debug, Default)]
struct CacheState {
    /// Most recently completed snapshot
    entry: Option<CatalogEntry>,
    stats: CacheStats,
}

// == Product Catalog Cache ==
/// Serves the full normalized catalog with minimal redundant network traffic.
///
/// Only one refresh runs at a time; callers that queue behind it reuse its
/// snapshot. A snapshot is installed only after every page has arrived, so a
/// failed or abandoned refresh leaves the previous snapshot in place.
pub struct ProductCatalogCache {
    source: Arc<dyn CatalogSource>,
    session: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    state: RwLock<CacheState>,
    /// Held for the duration of a refresh
    refresh_lock: Mutex<()>,
    ttl_ms: u64,
    per_page: u32,
}

impl ProductCatalogCache {
    // == Constructor ==
    /// Creates a cache with the default TTL and page size.
    pub fn new(
        source: Arc<dyn CatalogSource>,
        session: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            session,
            clock,
            state: RwLock::new(CacheState::default()),
            refresh_lock: Mutex::new(()),
            ttl_ms: DEFAULT_TTL_MS,
            per_page: MAX_UPSTREAM_PAGE_SIZE,
        }
    }

    /// Creates a cache against the configured catalog API, persisting to
    /// the configured session directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = WooCatalogSource::from_config(config)?;
        let session = FileSessionStore::new(config.session_cache_dir.clone());

        Ok(Self::new(Arc::new(source), Arc::new(session), Arc::new(SystemClock))
            .with_ttl_ms(config.cache_ttl * 1000)
            .with_per_page(config.per_page))
    }

    pub fn with_ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = ttl_ms;
        self
    }

    /// Sets the upstream page size, clamped to what the API accepts.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, MAX_UPSTREAM_PAGE_SIZE);
        self
    }

    // == Get Catalog ==
    /// Returns the full catalog.
    ///
    /// Either every upstream page is returned or an error is raised; callers
    /// never see a partial walk.
    pub async fn get_catalog(&self) -> Result<Arc<Vec<Product>>> {
        if let Some(data) = self.memory_lookup().await {
            return Ok(data);
        }

        let _refresh = self.refresh_lock.lock().await;

        // Whoever held the lock before us may have just refreshed
        if let Some(data) = self.memory_lookup().await {
            return Ok(data);
        }

        if let Some(data) = self.session_lookup().await {
            return Ok(data);
        }

        self.refresh().await
    }

    // == Force Refresh ==
    /// Walks the upstream pages regardless of freshness. On failure the
    /// current snapshot in both tiers is left untouched.
    pub async fn force_refresh(&self) -> Result<Arc<Vec<Product>>> {
        let _refresh = self.refresh_lock.lock().await;
        self.refresh().await
    }

    // == Last Snapshot ==
    /// Most recent completed snapshot regardless of freshness, for showing
    /// prior data after a failed refresh.
    pub async fn last_snapshot(&self) -> Option<CatalogEntry> {
        if let Some(entry) = self.state.read().await.entry.clone() {
            return Some(entry);
        }

        match self.session.get(SESSION_CACHE_KEY).await {
            Ok(Some(raw)) => CatalogEntry::from_persisted(&raw).ok(),
            _ => None,
        }
    }

    // == Invalidate ==
    /// Drops both tiers so the next request goes to the network.
    pub async fn invalidate(&self) {
        let _refresh = self.refresh_lock.lock().await;
        let removed = self.session.remove(SESSION_CACHE_KEY).await;

        let mut state = self.state.write().await;
        state.entry = None;
        state.stats.set_total_products(0);

        if let Err(e) = removed {
            warn!("Failed to clear persisted catalog: {}", e);
            state.stats.record_session_write_error();
        }
        info!("Catalog cache invalidated");
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.state.read().await.stats.clone()
    }

    // == Tier Lookups ==
    async fn memory_lookup(&self) -> Option<Arc<Vec<Product>>> {
        let now = self.clock.now_ms();
        let mut state = self.state.write().await;

        let entry = state
            .entry
            .as_ref()
            .filter(|entry| entry.is_fresh(now, self.ttl_ms))?;
        let data = Arc::clone(&entry.data);
        debug!(
            "Catalog served from memory ({} ms until stale)",
            entry.ttl_remaining_ms(now, self.ttl_ms)
        );

        state.stats.record_memory_hit();
        Some(data)
    }

    async fn session_lookup(&self) -> Option<Arc<Vec<Product>>> {
        let now = self.clock.now_ms();

        let parsed = match self.session.get(SESSION_CACHE_KEY).await {
            Ok(raw) => raw.map(|r| CatalogEntry::from_persisted(&r)).transpose(),
            Err(e) => Err(e),
        };

        let entry = match parsed {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                warn!("Ignoring persisted catalog: {}", e);
                self.state.write().await.stats.record_session_read_error();
                return None;
            }
        };

        if !entry.is_fresh(now, self.ttl_ms) {
            debug!("Persisted catalog is stale");
            return None;
        }

        let data = Arc::clone(&entry.data);
        let mut state = self.state.write().await;
        state.stats.record_session_hit();
        state.stats.set_total_products(data.len());
        state.entry = Some(entry);
        debug!("Catalog promoted from session store");
        Some(data)
    }

    // == Refresh ==
    /// Callers hold `refresh_lock`.
    async fn refresh(&self) -> Result<Arc<Vec<Product>>> {
        info!("Fetching full catalog from upstream");

        let mut pages = 0;
        let records = match self.fetch_all_pages(&mut pages).await {
            Ok(records) => records,
            Err(e) => {
                warn!("Catalog fetch failed after {} page(s): {}", pages, e);
                self.state.write().await.stats.record_fetch_failure(pages);
                return Err(e);
            }
        };

        let total_records = records.len();
        let products: Vec<Product> = records.iter().filter_map(Product::from_record).collect();
        if products.len() < total_records {
            warn!(
                "Skipped {} catalog record(s) without a usable id",
                total_records - products.len()
            );
        }

        let entry = CatalogEntry::new(products, self.clock.now_ms());
        let persisted = match entry.to_persisted() {
            Ok(raw) => self.session.set(SESSION_CACHE_KEY, &raw).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &persisted {
            warn!("Skipping catalog persistence: {}", e);
        }

        let data = Arc::clone(&entry.data);
        let mut state = self.state.write().await;
        if persisted.is_err() {
            state.stats.record_session_write_error();
        }
        state.stats.record_fetch(pages);
        state.stats.set_total_products(data.len());
        state.entry = Some(entry);

        info!("Fetched {} products across {} page(s)", data.len(), pages);
        Ok(data)
    }

    /// Requests pages 1..=N in order, where N is the page count advertised
    /// by the most recent response. `pages` counts requests made so far.
    async fn fetch_all_pages(&self, pages: &mut u32) -> Result<Vec<Value>> {
        let mut records = Vec::new();
        let mut advertised_items = None;
        let mut page = 1;

        loop {
            *pages += 1;
            let batch = self.source.fetch_page(page, self.per_page).await?;
            records.extend(batch.records);
            advertised_items = batch.total_items.or(advertised_items);

            if page >= batch.total_pages {
                break;
            }
            page += 1;
        }

        // The catalog can change between page requests
        if let Some(expected) = advertised_items {
            if expected != records.len() as u64 {
                warn!(
                    "Catalog advertised {} item(s) but the walk returned {}",
                    expected,
                    records.len()
                );
            }
        }

        Ok(records)
    }
}
