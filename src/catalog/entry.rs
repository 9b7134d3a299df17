//! Catalog Entry Module
//!
//! A timestamped catalog snapshot and its persisted representation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::error::{CatalogError, Result};

// == Catalog Entry ==
/// An immutable catalog snapshot. Refreshes replace it wholesale.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// The normalized products
    pub data: Arc<Vec<Product>>,
    /// When the snapshot was taken (Unix milliseconds)
    pub fetched_at: u64,
}

impl CatalogEntry {
    pub fn new(data: Vec<Product>, fetched_at: u64) -> Self {
        Self {
            data: Arc::new(data),
            fetched_at,
        }
    }

    // == Is Fresh ==
    /// Checks whether the snapshot is still usable at `now_ms`.
    ///
    /// Fresh while strictly less than `ttl_ms` has elapsed; an entry stamped
    /// in the future counts as fresh.
    pub fn is_fresh(&self, now_ms: u64, ttl_ms: u64) -> bool {
        now_ms.saturating_sub(self.fetched_at) < ttl_ms
    }

    /// Milliseconds until the snapshot goes stale, 0 once it has.
    pub fn ttl_remaining_ms(&self, now_ms: u64, ttl_ms: u64) -> u64 {
        ttl_ms.saturating_sub(now_ms.saturating_sub(self.fetched_at))
    }

    // == Persistence ==
    /// Serializes the snapshot for the session tier.
    pub fn to_persisted(&self) -> Result<String> {
        let persisted = PersistedEntry {
            fetched_at: self.fetched_at,
            data: self.data.as_ref().clone(),
        };
        serde_json::to_string(&persisted).map_err(|e| CatalogError::CacheWrite(e.to_string()))
    }

    /// Parses a session-tier blob. Anything not shaped like a snapshot is a read error.
    pub fn from_persisted(raw: &str) -> Result<Self> {
        let persisted: PersistedEntry =
            serde_json::from_str(raw).map_err(|e| CatalogError::CacheRead(e.to_string()))?;
        Ok(Self::new(persisted.data, persisted.fetched_at))
    }
}

// == Persisted Entry ==
/// Wire form of a snapshot in the session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedEntry {
    #[serde(rename = "fetchedAt", alias = "at")]
    pub fetched_at: u64,
    pub data: Vec<Product>,
}
