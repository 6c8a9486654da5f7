mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    routing::get,
};
use serde_json::Value;
use tower::ServiceExt;

use nft_market_tracker::AppState;
use nft_market_tracker::entities::rank_tables::{RankMetric, TimeWindow};
use nft_market_tracker::handlers::collections::{get_collection_history, get_top_collections};
use nft_market_tracker::jobs::daily_sync::run_if_due;
use nft_market_tracker::services::rankings::refresh_rank_table;
use nft_market_tracker::services::store::Store;
use nft_market_tracker::services::sync_status::{find_status, jobs};
use nft_market_tracker::services::top_collections::top_collections_page;

use crate::common::{FakeMarket, ranked, setup_store};

fn build_test_router(store: Store) -> Router {
    Router::new()
        .route("/api/collections/top", get(get_top_collections))
        .route(
            "/api/collections/{address}/history",
            get(get_collection_history),
        )
        .with_state(AppState::new(store))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

/// Store with a 12-entry salesCount/sevenDays table
async fn seeded_store() -> Store {
    let store = setup_store().await;
    let market = FakeMarket::new();
    let feed = (0..12)
        .map(|i| ranked(&format!("0x{:03}", i), &format!("{}", 100 - i)))
        .collect();
    market.set_top(RankMetric::SalesCount, TimeWindow::SevenDays, feed);
    refresh_rank_table(&store, &market, RankMetric::SalesCount, TimeWindow::SevenDays)
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn test_top_collections_pages() {
    let app = build_test_router(seeded_store().await);

    let (status, json) = get_json(
        app.clone(),
        "/api/collections/top?rank=salesCount&time=sevenDays",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["max"], 12);

    let first_page = json["collections"].as_array().unwrap();
    assert_eq!(first_page.len(), 10);
    assert_eq!(first_page[0]["address"], "0x000");
    assert_eq!(first_page[0]["value"], "100");
    assert_eq!(first_page[9]["address"], "0x009");
    assert!(first_page[0].get("image").is_some());

    let (status, json) = get_json(
        app,
        "/api/collections/top?rank=salesCount&time=sevenDays&cursor=1",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let second_page = json["collections"].as_array().unwrap();
    assert_eq!(second_page.len(), 2);
    assert_eq!(second_page[1]["address"], "0x011");
    assert_eq!(second_page[1]["value"], "89");
}

#[tokio::test]
async fn test_top_collections_missing_table_is_empty() {
    let app = build_test_router(seeded_store().await);

    let (status, json) = get_json(app, "/api/collections/top").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["max"], 0);
    assert!(json["collections"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_top_collections_rejects_bad_query() {
    let app = build_test_router(setup_store().await);

    let (status, json) = get_json(app.clone(), "/api/collections/top?rank=floor").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("floor"));

    let (status, _) = get_json(app, "/api/collections/top?cursor=-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_top_collections_huge_cursor_is_rejected() {
    let app = build_test_router(seeded_store().await);

    let (status, json) = get_json(
        app.clone(),
        "/api/collections/top?rank=salesCount&time=sevenDays&cursor=9223372036854775807",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("cursor"));

    // Past the last page is an empty page, not an error
    let (status, json) = get_json(
        app,
        "/api/collections/top?rank=salesCount&time=sevenDays&cursor=5",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["max"], 12);
    assert!(json["collections"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_page_offset_overflow_returns_empty_page() {
    let store = seeded_store().await;

    let page = top_collections_page(&store, RankMetric::SalesCount, TimeWindow::SevenDays, u64::MAX)
        .await
        .unwrap();
    assert!(page.collections.is_empty());
    assert_eq!(page.max, 12);
}

#[tokio::test]
async fn test_top_collections_accepts_upstream_spellings() {
    let app = build_test_router(seeded_store().await);

    let (status, json) = get_json(
        app,
        "/api/collections/top?rank=RANK_TYPE_SALES_COUNT&time=DURATION_7_DAYS",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["max"], 12);
}

#[tokio::test]
async fn test_collection_history() {
    let app = build_test_router(seeded_store().await);

    let (status, json) = get_json(app.clone(), "/api/collections/0x003/history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["address"], "0x003");
    let points = json["dataPoints"].as_array().unwrap();
    assert_eq!(points.len(), 3);

    let (status, json) = get_json(app, "/api/collections/0xunknown/history").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().is_some());
}

#[tokio::test]
async fn test_run_if_due_records_and_skips() {
    let store = setup_store().await;
    let market = FakeMarket::new();
    market.set_top_everywhere(vec![ranked("0xaaa", "1")]);

    run_if_due(&store, &market, 86_400).await;

    let status = find_status(store.connection(), jobs::DAILY_SYNC)
        .await
        .unwrap()
        .expect("status recorded");
    assert_eq!(status.success_count, 1);
    assert_eq!(status.min_interval_secs, 86_400);
    assert!(status.last_error.is_none());
    let fetches = market.total_calls("top_collections");
    assert_eq!(fetches, 16);

    // Second call inside the interval is a no-op
    run_if_due(&store, &market, 86_400).await;
    assert_eq!(market.total_calls("top_collections"), fetches);
}

#[tokio::test]
async fn test_run_if_due_records_failure() {
    let store = setup_store().await;
    let market = FakeMarket::new();
    market.fail_top(RankMetric::AvgPrice, TimeWindow::OneDay);

    run_if_due(&store, &market, 86_400).await;

    let status = find_status(store.connection(), jobs::DAILY_SYNC)
        .await
        .unwrap()
        .expect("status recorded");
    assert_eq!(status.success_count, 0);
    assert_eq!(status.error_count, 1);
    assert!(status.last_error.is_some());

    // A failed run stays due
    run_if_due(&store, &market, 86_400).await;
    assert_eq!(market.total_calls("top_collections"), 2);
}
