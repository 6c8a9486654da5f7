use std::sync::Arc;

use tokio::time::{interval, Duration};

use crate::services::daily_sync::run_daily_sync;
use crate::services::mnemonic::MarketDataSource;
use crate::services::store::Store;
use crate::services::sync_status::{self, jobs};

pub async fn start_daily_sync_job(
    store: Store,
    market: Arc<dyn MarketDataSource>,
    interval_secs: u64,
) {
    tokio::spawn(async move {
        // First tick fires immediately, so startup runs when due
        let mut interval = interval(Duration::from_secs(interval_secs));

        loop {
            interval.tick().await;
            run_if_due(&store, market.as_ref(), interval_secs).await;
        }
    });
}

/// Runs the daily sync unless it already succeeded within the interval, and
/// records the outcome.
pub async fn run_if_due(store: &Store, market: &dyn MarketDataSource, interval_secs: u64) {
    let db = store.connection();
    let min_interval = i32::try_from(interval_secs).unwrap_or(i32::MAX);

    match sync_status::should_sync(db, jobs::DAILY_SYNC).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::debug!("Skipping daily sync (recently synced)");
            return;
        }
        Err(e) => {
            tracing::warn!("Failed to check sync status, running sync anyway: {}", e);
        }
    }

    tracing::info!("Starting daily sync");
    match run_daily_sync(store, market).await {
        Ok(_) => {
            if let Err(e) = sync_status::record_success(db, jobs::DAILY_SYNC, min_interval).await {
                tracing::warn!("Failed to record sync success: {}", e);
            }
        }
        Err(e) => {
            tracing::error!("Daily sync failed: {}", e);
            if let Err(e2) =
                sync_status::record_failure(db, jobs::DAILY_SYNC, &e.to_string(), min_interval)
                    .await
            {
                tracing::warn!("Failed to record sync failure: {}", e2);
            }
        }
    }
}
