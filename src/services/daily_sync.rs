//! The daily maintenance run: refresh history, rebuild rankings, refresh
//! floor prices. Each phase is idempotent, so a failed run is recovered by
//! running again.

use crate::entities::rank_tables::TimeWindow;
use crate::error::SyncError;
use crate::models::mnemonic::TimeGroup;
use crate::services::floor_price::{FloorRefreshOutcome, refresh_floor_prices};
use crate::services::mnemonic::MarketDataSource;
use crate::services::rankings::{RankRefreshOutcome, refresh_all_rankings};
use crate::services::store::Store;
use crate::services::time_series::populate_data_points;

#[derive(Debug, Clone, Default)]
pub struct DailySyncReport {
    /// False when the store was empty and the history phase was skipped
    pub refreshed_existing: bool,
    pub data_points_written: usize,
    pub rankings: Vec<RankRefreshOutcome>,
    pub floor: FloorRefreshOutcome,
}

/// Pulls the last day of samples for every collection already in the store.
pub async fn refresh_time_series(
    store: &Store,
    market: &dyn MarketDataSource,
) -> Result<usize, SyncError> {
    let collections = store.all_collections().await?;
    tracing::info!("Refreshing time series for {} collections", collections.len());

    let mut written = 0;
    for collection in &collections {
        written += populate_data_points(
            store,
            market,
            collection.id,
            &collection.address,
            TimeWindow::OneDay,
            TimeGroup::OneDay,
        )
        .await?;
    }

    Ok(written)
}

pub async fn run_daily_sync(
    store: &Store,
    market: &dyn MarketDataSource,
) -> Result<DailySyncReport, SyncError> {
    let mut report = DailySyncReport::default();

    let existing = store.count_collections().await?;
    if existing > 0 {
        report.data_points_written = refresh_time_series(store, market).await?;
        report.refreshed_existing = true;
    } else {
        tracing::info!("Store is empty, seeding from rankings");
    }

    report.rankings = refresh_all_rankings(store, market).await?;
    report.floor = refresh_floor_prices(store, market).await?;

    tracing::info!(
        "Daily sync complete: {} data points refreshed, {} ranking tables, {} floor prices",
        report.data_points_written,
        report.rankings.len(),
        report.floor.updated
    );

    Ok(report)
}
