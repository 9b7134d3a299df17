//! Integration Tests for API Endpoints
//!
//! Runs a mock catalog API and storefront feed on an ephemeral port and
//! drives the service router against them.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use storefront_catalog::{api::create_router, AppState, Config};
use tower::ServiceExt;

// == Mock Upstream ==

#[derive(Clone)]
struct MockState {
    products: Arc<Vec<Value>>,
    feed: Arc<Value>,
    product_requests: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

struct MockUpstream {
    addr: SocketAddr,
    product_requests: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

/// Product `i`: odd ids in stock, every fifth on sale for 5 less, every
/// third in "Men" and the rest in "Women".
fn catalog_fixture(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|i| {
            let price = i as f64 * 10.0;
            json!({
                "id": i,
                "name": format!("Product {:02}", i),
                "price": format!("{:.2}", price),
                "sale_price": if i % 5 == 0 { format!("{:.2}", price - 5.0) } else { String::new() },
                "stock_status": if i % 2 == 1 { "instock" } else { "outofstock" },
                "categories": [{"id": i % 3, "name": if i % 3 == 0 { "Men" } else { "Women" }}],
                "images": [{"src": format!("https://img.test/{}.jpg", i)}]
            })
        })
        .collect()
}

fn feed_fixture() -> Value {
    let mut products = Vec::new();
    for i in 1..=13 {
        products.push(json!({
            "id": i,
            "title": format!("Arrival {:02}", i),
            "product_type": if i <= 8 { "Frocks" } else { "Shirts" },
            "tags": ["New Arrivals"],
            "created_at": format!("2024-01-{:02}T09:00:00+05:00", i),
            "variants": [{"price": "1500.00", "compare_at_price": "2000.00"}],
            "images": []
        }));
    }
    products.push(json!({
        "id": 100,
        "title": "Classic Tee",
        "product_type": "Shirts",
        "tags": ["Best Seller"],
        "created_at": "2023-06-01T00:00:00Z",
        "variants": [],
        "images": []
    }));
    json!({ "products": products })
}

async fn mock_products(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.product_requests.fetch_add(1, Ordering::SeqCst);
    if state.fail.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream down").into_response();
    }

    let per_page: usize = params.get("per_page").and_then(|v| v.parse().ok()).unwrap_or(10);
    let page: usize = params.get("page").and_then(|v| v.parse().ok()).unwrap_or(1);
    let total = state.products.len();
    let total_pages = total.div_ceil(per_page).max(1);

    let items: Vec<Value> = state
        .products
        .iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .cloned()
        .collect();

    let mut headers = HeaderMap::new();
    headers.insert("x-wp-totalpages", HeaderValue::from(total_pages));
    headers.insert("x-wp-total", HeaderValue::from(total));
    (headers, Json(items)).into_response()
}

async fn mock_feed(State(state): State<MockState>) -> Json<Value> {
    Json(state.feed.as_ref().clone())
}

async fn spawn_upstream(product_count: usize) -> MockUpstream {
    let state = MockState {
        products: Arc::new(catalog_fixture(product_count)),
        feed: Arc::new(feed_fixture()),
        product_requests: Arc::new(AtomicUsize::new(0)),
        fail: Arc::new(AtomicBool::new(false)),
    };
    let upstream = MockUpstream {
        addr: "127.0.0.1:0".parse().unwrap(),
        product_requests: state.product_requests.clone(),
        fail: state.fail.clone(),
    };

    let app = Router::new()
        .route("/wp-json/wc/v3/products", get(mock_products))
        .route("/products.json", get(mock_feed))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(upstream.addr).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream { addr, ..upstream }
}

// == Helper Functions ==

fn test_config(upstream: &MockUpstream, name: &str) -> Config {
    let session_dir = std::env::temp_dir().join(format!(
        "storefront_catalog_it_{}_{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&session_dir);

    Config {
        catalog_base_url: format!("http://{}/wp-json/wc/v3", upstream.addr),
        feed_base_url: format!("http://{}", upstream.addr),
        per_page: 10,
        fetch_timeout: 5,
        session_cache_dir: session_dir,
        ..Config::default()
    }
}

fn app_for(config: &Config) -> Router {
    create_router(AppState::from_config(config).unwrap())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn names(json: &Value) -> Vec<String> {
    json["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

// == Products Endpoint Tests ==

#[tokio::test]
async fn test_products_walks_every_upstream_page() {
    let upstream = spawn_upstream(25).await;
    let app = app_for(&test_config(&upstream, "walk"));

    let (status, json) = get_json(&app, "/products").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(upstream.product_requests.load(Ordering::SeqCst), 3);
    assert_eq!(json["total_count"], 25);
    assert_eq!(json["total_pages"], 3);
    assert_eq!(json["products"].as_array().unwrap().len(), 12);
    assert!(json.get("notice").is_none());
}

#[tokio::test]
async fn test_products_pages_past_the_end_are_empty() {
    let upstream = spawn_upstream(25).await;
    let app = app_for(&test_config(&upstream, "past_end"));

    let (_, page3) = get_json(&app, "/products?page=3").await;
    assert_eq!(names(&page3), vec!["Product 25"]);

    let (status, page4) = get_json(&app, "/products?page=4").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page4["products"].as_array().unwrap().is_empty());
    assert_eq!(page4["total_pages"], 3);

    // Served from memory after the first walk
    assert_eq!(upstream.product_requests.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_products_filters_and_sorts() {
    let upstream = spawn_upstream(25).await;
    let app = app_for(&test_config(&upstream, "filters"));

    let (_, json) = get_json(&app, "/products?stock=instock&price_sort=high-low").await;

    assert_eq!(json["total_count"], 13);
    assert_eq!(json["active_filters_count"], 2);
    let listed = names(&json);
    assert_eq!(listed[0], "Product 25");
    assert_eq!(listed[1], "Product 23");

    // Price stats cover the whole catalog, sale prices included
    assert_eq!(json["price_stats"]["min"], 10.0);
    assert_eq!(json["price_stats"]["max"], 245.0);
}

#[tokio::test]
async fn test_products_on_sale_in_category() {
    let upstream = spawn_upstream(25).await;
    let app = app_for(&test_config(&upstream, "on_sale"));

    let (_, json) = get_json(&app, "/products?stock=onsale&category=men&alpha_sort=z-a").await;

    // Ids divisible by both 3 and 5
    assert_eq!(names(&json), vec!["Product 15"]);
}

#[tokio::test]
async fn test_products_malformed_filters_are_ignored() {
    let upstream = spawn_upstream(25).await;
    let app = app_for(&test_config(&upstream, "malformed"));

    let (status, json) =
        get_json(&app, "/products?min_price=cheap&stock=whatever&page=two").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_count"], 25);
    assert_eq!(json["active_filters_count"], 0);
    assert_eq!(json["page"], 1);
}

#[tokio::test]
async fn test_products_upstream_failure_without_snapshot() {
    let upstream = spawn_upstream(5).await;
    upstream.fail.store(true, Ordering::SeqCst);
    let app = app_for(&test_config(&upstream, "failure"));

    let (status, json) = get_json(&app, "/products").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn test_products_failed_refresh_serves_previous_snapshot() {
    let upstream = spawn_upstream(5).await;
    let config = Config {
        cache_ttl: 0,
        ..test_config(&upstream, "stale")
    };
    let app = app_for(&config);

    let (_, first) = get_json(&app, "/products").await;
    assert_eq!(first["total_count"], 5);

    upstream.fail.store(true, Ordering::SeqCst);
    let (status, second) = get_json(&app, "/products").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["total_count"], 5);
    assert!(second["notice"].as_str().is_some());
}

#[tokio::test]
async fn test_session_tier_survives_restart() {
    let upstream = spawn_upstream(5).await;
    let config = test_config(&upstream, "restart");

    let (_, _) = get_json(&app_for(&config), "/products").await;
    assert_eq!(upstream.product_requests.load(Ordering::SeqCst), 1);

    // A fresh service reads the persisted snapshot instead of the network
    let (status, json) = get_json(&app_for(&config), "/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_count"], 5);
    assert_eq!(upstream.product_requests.load(Ordering::SeqCst), 1);
}

// == Categories, Refresh and Stats ==

#[tokio::test]
async fn test_categories_endpoint() {
    let upstream = spawn_upstream(6).await;
    let app = app_for(&test_config(&upstream, "categories"));

    let (status, json) = get_json(&app, "/categories").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["categories"],
        json!(["Kids", "Boys", "Girls", "Men", "Women"])
    );
}

#[tokio::test]
async fn test_refresh_endpoint_refetches() {
    let upstream = spawn_upstream(5).await;
    let app = app_for(&test_config(&upstream, "refresh"));

    get_json(&app, "/products").await;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/refresh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(upstream.product_requests.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_failed_refresh_keeps_serving_catalog() {
    let upstream = spawn_upstream(5).await;
    let app = app_for(&test_config(&upstream, "refresh_failure"));

    get_json(&app, "/products").await;
    upstream.fail.store(true, Ordering::SeqCst);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/refresh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let (status, json) = get_json(&app, "/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_count"], 5);
}

#[tokio::test]
async fn test_products_huge_page_is_empty() {
    let upstream = spawn_upstream(25).await;
    let app = app_for(&test_config(&upstream, "huge_page"));

    let (status, json) = get_json(&app, "/products?page=4611686018427387905").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["products"].as_array().unwrap().is_empty());
    assert_eq!(json["total_pages"], 3);
}

#[tokio::test]
async fn test_stats_endpoint_tracks_tiers() {
    let upstream = spawn_upstream(25).await;
    let app = app_for(&test_config(&upstream, "stats"));

    get_json(&app, "/products").await;
    get_json(&app, "/products?page=2").await;
    let (status, json) = get_json(&app, "/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["network_fetches"], 1);
    assert_eq!(json["pages_requested"], 3);
    assert_eq!(json["memory_hits"], 1);
    assert_eq!(json["total_products"], 25);
    assert_eq!(json["hit_rate"], 0.5);
}

// == Feed Endpoint Tests ==

#[tokio::test]
async fn test_new_arrivals_endpoint() {
    let upstream = spawn_upstream(1).await;
    let app = app_for(&test_config(&upstream, "arrivals"));

    let (status, json) = get_json(&app, "/new-arrivals").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_count"], 13);
    assert_eq!(json["total_pages"], 2);
    assert_eq!(json["products"].as_array().unwrap().len(), 10);
    assert_eq!(json["products"][0]["title"], "Arrival 13");
    assert_eq!(json["products"][0]["discount_percentage"], 25);
    assert_eq!(json["categories"], json!(["All", "Shirts", "Frocks"]));

    let (_, shirts) = get_json(&app, "/new-arrivals?category=Shirts").await;
    assert_eq!(shirts["total_count"], 5);
    assert_eq!(shirts["total_pages"], 1);
}

#[tokio::test]
async fn test_most_popular_endpoint() {
    let upstream = spawn_upstream(1).await;
    let app = app_for(&test_config(&upstream, "popular"));

    let (status, json) = get_json(&app, "/most-popular").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_count"], 1);
    assert_eq!(json["products"][0]["title"], "Classic Tee");
}

#[tokio::test]
async fn test_health_endpoint() {
    let upstream = spawn_upstream(1).await;
    let app = app_for(&test_config(&upstream, "health"));

    let (status, json) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}
