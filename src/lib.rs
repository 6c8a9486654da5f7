// src/lib.rs

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use entities::rank_tables::{RankMetric, TimeWindow};
use models::collections::TopCollectionsResponse;
use services::store::Store;

/// Ranking pages keyed by (metric, window, page)
pub type PageCache = Cache<(RankMetric, TimeWindow, u64), TopCollectionsResponse>;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub page_cache: Arc<PageCache>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        let page_cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(60))
            .build();

        Self {
            store,
            page_cache: Arc::new(page_cache),
        }
    }
}

pub mod entities {
    pub mod prelude;
    pub mod collections;
    pub mod data_points;
    pub mod rank_tables;
    pub mod rank_table_entries;
    pub mod sync_status;
}

pub mod services {
    pub mod mnemonic;
    pub mod store;
    pub mod collection_resolver;
    pub mod time_series;
    pub mod rankings;
    pub mod floor_price;
    pub mod daily_sync;
    pub mod sync_status;
    pub mod top_collections;
}

pub mod config;
pub mod error;
pub mod models;
pub mod handlers;
pub mod jobs;
