#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tokio::sync::Barrier;

use nft_market_tracker::entities::rank_tables::{RankMetric, TimeWindow};
use nft_market_tracker::error::MarketDataError;
use nft_market_tracker::models::mnemonic::{
    CollectionMeta, FloorPrice, FloorPriceValue, MetadataEntry, MetadataType, OwnersSample,
    PriceSample, RankedCollection, SalesSample, SupplySample, TimeGroup, TimeSeries,
    TopCollections,
};
use nft_market_tracker::services::mnemonic::MarketDataSource;
use nft_market_tracker::services::store::Store;

/// Fresh in-memory SQLite database with migrations applied.
///
/// A single pooled connection keeps every query on the same in-memory database.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn setup_store() -> Store {
    Store::new(setup_test_db().await.expect("Failed to set up test DB"))
}

pub fn sample_time(day: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 11, 1, 0, 0, 0).unwrap() + Duration::days(day)
}

pub fn ranked(address: &str, avg_price: &str) -> RankedCollection {
    RankedCollection {
        contract_address: address.to_string(),
        avg_price: Some(avg_price.to_string()),
        ..Default::default()
    }
}

/// Series lengths returned for every address
#[derive(Debug, Clone, Copy)]
pub struct SeriesLengths {
    pub prices: usize,
    pub sales: usize,
    pub supply: usize,
    pub owners: usize,
}

impl Default for SeriesLengths {
    fn default() -> Self {
        Self {
            prices: 3,
            sales: 3,
            supply: 3,
            owners: 3,
        }
    }
}

/// Scripted market data source that counts every call.
#[derive(Default)]
pub struct FakeMarket {
    calls: Mutex<HashMap<(&'static str, String), usize>>,
    pub lengths: Mutex<SeriesLengths>,
    top: Mutex<HashMap<(RankMetric, TimeWindow), Vec<RankedCollection>>>,
    failing_top: Mutex<HashSet<(RankMetric, TimeWindow)>>,
    failing_floor: Mutex<HashSet<String>>,
    fail_owners: Mutex<bool>,
    floors: Mutex<HashMap<String, Decimal>>,
    /// Holds every metadata call until this many callers are waiting
    meta_barrier: Mutex<Option<Arc<Barrier>>>,
}

impl FakeMarket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lengths(self, lengths: SeriesLengths) -> Self {
        *self.lengths.lock() = lengths;
        self
    }

    pub fn set_top(&self, metric: RankMetric, window: TimeWindow, entries: Vec<RankedCollection>) {
        self.top.lock().insert((metric, window), entries);
    }

    /// Same feed for every metric × window pair
    pub fn set_top_everywhere(&self, entries: Vec<RankedCollection>) {
        use sea_orm::Iterable;
        for metric in RankMetric::iter() {
            for window in TimeWindow::iter() {
                self.set_top(metric, window, entries.clone());
            }
        }
    }

    pub fn fail_top(&self, metric: RankMetric, window: TimeWindow) {
        self.failing_top.lock().insert((metric, window));
    }

    pub fn fail_floor(&self, address: &str) {
        self.failing_floor.lock().insert(address.to_string());
    }

    pub fn fail_owners(&self, fail: bool) {
        *self.fail_owners.lock() = fail;
    }

    pub fn set_floor(&self, address: &str, floor: Decimal) {
        self.floors.lock().insert(address.to_string(), floor);
    }

    pub fn gate_metadata(&self, callers: usize) {
        *self.meta_barrier.lock() = Some(Arc::new(Barrier::new(callers)));
    }

    pub fn calls(&self, method: &'static str, key: &str) -> usize {
        self.calls
            .lock()
            .get(&(method, key.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self, method: &'static str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|((m, _), _)| *m == method)
            .map(|(_, count)| *count)
            .sum()
    }

    fn record(&self, method: &'static str, key: &str) {
        *self.calls.lock().entry((method, key.to_string())).or_insert(0) += 1;
    }
}

#[async_trait]
impl MarketDataSource for FakeMarket {
    async fn collection_meta(&self, address: &str) -> Result<CollectionMeta, MarketDataError> {
        self.record("collection_meta", address);

        let barrier = self.meta_barrier.lock().clone();
        if let Some(barrier) = barrier {
            barrier.wait().await;
        }

        Ok(CollectionMeta {
            name: format!("Collection {}", address),
            types: vec!["TOKEN_TYPE_ERC721".to_string()],
            owners_count: Decimal::from(4200),
            tokens_count: Decimal::from(10000),
            sales_volume: Decimal::new(12345, 1),
            metadata: vec![
                MetadataEntry {
                    kind: MetadataType::Image,
                    value: format!("ipfs://{}/image", address),
                },
                MetadataEntry {
                    kind: MetadataType::Description,
                    value: "A test collection".to_string(),
                },
            ],
        })
    }

    async fn collection_price_history(
        &self,
        address: &str,
        _window: TimeWindow,
        _granularity: TimeGroup,
        _anchor: DateTime<Utc>,
    ) -> Result<TimeSeries<PriceSample>, MarketDataError> {
        self.record("price_history", address);
        let n = self.lengths.lock().prices as i64;
        Ok(TimeSeries::new(
            (0..n)
                .map(|i| PriceSample {
                    timestamp: sample_time(i),
                    avg: Some(Decimal::from(i + 1)),
                    max: Some(Decimal::from(2 * (i + 1))),
                    min: Some(Decimal::new(5, 1)),
                })
                .collect(),
        ))
    }

    async fn collection_sales_volume(
        &self,
        address: &str,
        _window: TimeWindow,
        _granularity: TimeGroup,
        _anchor: DateTime<Utc>,
    ) -> Result<TimeSeries<SalesSample>, MarketDataError> {
        self.record("sales_volume", address);
        let n = self.lengths.lock().sales as i64;
        Ok(TimeSeries::new(
            (0..n)
                .map(|i| SalesSample {
                    timestamp: sample_time(i),
                    count: Some(Decimal::from(10 + i)),
                    volume: Some(Decimal::new(25, 1)),
                })
                .collect(),
        ))
    }

    async fn collection_tokens_supply(
        &self,
        address: &str,
        _window: TimeWindow,
        _granularity: TimeGroup,
        _anchor: DateTime<Utc>,
    ) -> Result<TimeSeries<SupplySample>, MarketDataError> {
        self.record("tokens_supply", address);
        let n = self.lengths.lock().supply as i64;
        Ok(TimeSeries::new(
            (0..n)
                .map(|i| SupplySample {
                    timestamp: sample_time(i),
                    minted: Some(Decimal::from(2)),
                    burned: Some(Decimal::ZERO),
                    total_minted: Some(Decimal::from(100 + 2 * i)),
                    total_burned: Some(Decimal::ZERO),
                })
                .collect(),
        ))
    }

    async fn collection_owners_count(
        &self,
        address: &str,
        _window: TimeWindow,
        _granularity: TimeGroup,
        _anchor: DateTime<Utc>,
    ) -> Result<TimeSeries<OwnersSample>, MarketDataError> {
        self.record("owners_count", address);
        if *self.fail_owners.lock() {
            return Err(MarketDataError::Api {
                status: 503,
                body: "owners count unavailable".to_string(),
            });
        }
        let n = self.lengths.lock().owners as i64;
        Ok(TimeSeries::new(
            (0..n)
                .map(|i| OwnersSample {
                    timestamp: sample_time(i),
                    count: Some(Decimal::from(400 + i)),
                })
                .collect(),
        ))
    }

    async fn floor_price(&self, address: &str) -> Result<FloorPrice, MarketDataError> {
        self.record("floor_price", address);
        if self.failing_floor.lock().contains(address) {
            return Err(MarketDataError::Api {
                status: 500,
                body: "floor unavailable".to_string(),
            });
        }
        let floor = self
            .floors
            .lock()
            .get(address)
            .copied()
            .unwrap_or(Decimal::new(15, 1));
        Ok(FloorPrice {
            price: FloorPriceValue {
                total_native: Some(floor),
                total_usd: None,
            },
        })
    }

    async fn top_collections(
        &self,
        metric: RankMetric,
        window: TimeWindow,
    ) -> Result<TopCollections, MarketDataError> {
        self.record("top_collections", &format!("{:?}/{:?}", metric, window));
        if self.failing_top.lock().contains(&(metric, window)) {
            return Err(MarketDataError::InvalidResponse("top collections".to_string()));
        }
        Ok(TopCollections {
            collections: self
                .top
                .lock()
                .get(&(metric, window))
                .cloned()
                .unwrap_or_default(),
        })
    }
}
