use crate::error::SyncError;
use crate::services::mnemonic::MarketDataSource;
use crate::services::store::{PendingOp, Store};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FloorRefreshOutcome {
    pub updated: usize,
    pub skipped: usize,
}

/// Re-reads the floor price of every tracked collection and writes all of
/// them in one batch. A collection whose fetch fails, or whose response has
/// no native price, keeps its previous floor.
pub async fn refresh_floor_prices(
    store: &Store,
    market: &dyn MarketDataSource,
) -> Result<FloorRefreshOutcome, SyncError> {
    let collections = store.all_collections().await?;

    tracing::info!("Refreshing floor prices for {} collections", collections.len());

    let mut ops = Vec::with_capacity(collections.len());
    let mut skipped = 0;

    for collection in &collections {
        match market.floor_price(&collection.address).await {
            Ok(response) => match response.price.total_native {
                Some(floor) => ops.push(PendingOp::SetFloor {
                    collection_id: collection.id,
                    floor,
                }),
                None => {
                    tracing::debug!("No native floor price for {}", collection.address);
                    skipped += 1;
                }
            },
            Err(e) => {
                tracing::warn!(
                    "Failed to fetch floor price for {} ({}): {}",
                    collection.name,
                    collection.address,
                    e
                );
                skipped += 1;
            }
        }
    }

    let updated = ops.len();
    store.commit_batch(ops).await?;

    tracing::info!(
        "Floor price refresh complete: {} updated, {} skipped",
        updated,
        skipped
    );

    Ok(FloorRefreshOutcome { updated, skipped })
}
