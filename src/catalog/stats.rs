//! Cache Statistics Module
//!
//! Tracks how catalog requests were served: which tier answered, how many
//! network refreshes ran, and which best-effort persistence steps failed.

use serde::Serialize;

// == Cache Stats ==
/// Tracks catalog cache metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Requests answered by the in-memory tier
    pub memory_hits: u64,
    /// Requests answered by the persisted session tier
    pub session_hits: u64,
    /// Completed network refreshes
    pub network_fetches: u64,
    /// Upstream pages requested across all refreshes
    pub pages_requested: u64,
    /// Refreshes that ended in a fetch error
    pub fetch_failures: u64,
    /// Corrupt or unreadable session entries treated as misses
    pub session_read_errors: u64,
    /// Session writes that were dropped
    pub session_write_errors: u64,
    /// Products in the current snapshot
    pub total_products: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Share of requests served without going to the network.
    ///
    /// Returns 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.memory_hits + self.session_hits;
        let total = hits + self.network_fetches + self.fetch_failures;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    pub fn record_memory_hit(&mut self) {
        self.memory_hits += 1;
    }

    pub fn record_session_hit(&mut self) {
        self.session_hits += 1;
    }

    pub fn record_fetch(&mut self, pages: u32) {
        self.network_fetches += 1;
        self.pages_requested += u64::from(pages);
    }

    /// A failed refresh still counts the pages it managed to request.
    pub fn record_fetch_failure(&mut self, pages: u32) {
        self.fetch_failures += 1;
        self.pages_requested += u64::from(pages);
    }

    pub fn record_session_read_error(&mut self) {
        self.session_read_errors += 1;
    }

    pub fn record_session_write_error(&mut self) {
        self.session_write_errors += 1;
    }

    pub fn set_total_products(&mut self, count: usize) {
        self.total_products = count;
    }
}
