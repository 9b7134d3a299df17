//! Property-Based Tests for Catalog Module
//!
//! Uses proptest to check the page walk and the freshness window.

use proptest::prelude::*;
use std::sync::Arc;

use crate::catalog::test_support::{record, ScriptedSource};
use crate::catalog::{ManualClock, MemorySessionStore, ProductCatalogCache, DEFAULT_TTL_MS};

const T0: u64 = 1_000_000;

// == Strategies ==
/// Generates upstream page layouts: item counts per page
fn page_layout_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..25, 1..6)
}

fn build_pages(layout: &[usize]) -> Vec<Vec<serde_json::Value>> {
    let mut next_id = 1;
    layout
        .iter()
        .map(|count| {
            (0..*count)
                .map(|_| {
                    let id = next_id;
                    next_id += 1;
                    record(id, &format!("Product {}", id), id as f64, None, "instock")
                })
                .collect()
        })
        .collect()
}

fn cache_over(source: Arc<ScriptedSource>, clock: &ManualClock) -> ProductCatalogCache {
    ProductCatalogCache::new(
        source,
        Arc::new(MemorySessionStore::new()),
        Arc::new(clock.clone()),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Every advertised page is requested once, in order, and the merged
    // catalog holds exactly the items of all pages.
    #[test]
    fn prop_page_walk_pass_through(layout in page_layout_strategy()) {
        let source = Arc::new(ScriptedSource::new(build_pages(&layout)));
        let clock = ManualClock::new(T0);
        let cache = cache_over(source.clone(), &clock);

        let catalog = tokio_test::block_on(cache.get_catalog()).unwrap();

        let expected_pages: Vec<u32> = (1..=layout.len() as u32).collect();
        prop_assert_eq!(source.requested_pages(), expected_pages);
        prop_assert_eq!(catalog.len(), layout.iter().sum::<usize>());
    }

    // Inside the TTL the snapshot is reused; from the TTL on it is refetched.
    #[test]
    fn prop_freshness_window(elapsed in 0u64..(2 * DEFAULT_TTL_MS)) {
        let source = Arc::new(ScriptedSource::new(build_pages(&[3])));
        let clock = ManualClock::new(T0);
        let cache = cache_over(source.clone(), &clock);

        tokio_test::block_on(cache.get_catalog()).unwrap();
        clock.advance(elapsed);
        tokio_test::block_on(cache.get_catalog()).unwrap();

        let expected_calls = if elapsed < DEFAULT_TTL_MS { 1 } else { 2 };
        prop_assert_eq!(source.calls(), expected_calls);
    }
}
