use chrono::{DateTime, Local, NaiveTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sea_orm::Set;

use crate::entities::data_points;
use crate::entities::rank_tables::TimeWindow;
use crate::error::SyncError;
use crate::models::mnemonic::{
    OwnersSample, PriceSample, SalesSample, SupplySample, TimeGroup, TimeSeries,
};
use crate::services::mnemonic::MarketDataSource;
use crate::services::store::{PendingOp, Store};

/// History fetched for a collection the first time it is seen
pub const DEFAULT_WINDOW: TimeWindow = TimeWindow::ThirtyDays;
pub const DEFAULT_GRANULARITY: TimeGroup = TimeGroup::OneDay;

/// Start of the current local calendar day, as a UTC instant.
///
/// Falls back to UTC midnight when local midnight does not exist (DST gap).
pub fn day_anchor(now: DateTime<Local>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    midnight
        .and_local_timezone(Local)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

/// Fetches the four series for a collection and upserts one data point per
/// price sample, all in a single batch. Returns the number of points written.
pub async fn populate_data_points(
    store: &Store,
    market: &dyn MarketDataSource,
    collection_id: i32,
    address: &str,
    window: TimeWindow,
    granularity: TimeGroup,
) -> Result<usize, SyncError> {
    let anchor = day_anchor(Local::now());

    let (prices, sales, supply, owners) = tokio::try_join!(
        market.collection_price_history(address, window, granularity, anchor),
        market.collection_sales_volume(address, window, granularity, anchor),
        market.collection_tokens_supply(address, window, granularity, anchor),
        market.collection_owners_count(address, window, granularity, anchor),
    )?;

    if prices.len() != sales.len() || prices.len() != supply.len() || prices.len() != owners.len()
    {
        tracing::warn!(
            address,
            prices = prices.len(),
            sales = sales.len(),
            supply = supply.len(),
            owners = owners.len(),
            "Time series lengths differ, unmatched fields will be null"
        );
    }

    let ops: Vec<PendingOp> = merge_series(collection_id, &prices, &sales, &supply, &owners)
        .into_iter()
        .map(PendingOp::UpsertDataPoint)
        .collect();
    let written = ops.len();

    store.commit_batch(ops).await?;

    tracing::debug!("Stored {} data points for {}", written, address);
    Ok(written)
}

/// Aligns the four series by position. The price series drives the output:
/// one point per price sample, keyed by that sample's timestamp.
pub fn merge_series(
    collection_id: i32,
    prices: &TimeSeries<PriceSample>,
    sales: &TimeSeries<SalesSample>,
    supply: &TimeSeries<SupplySample>,
    owners: &TimeSeries<OwnersSample>,
) -> Vec<data_points::ActiveModel> {
    prices
        .data_points
        .iter()
        .enumerate()
        .map(|(i, price)| {
            let sale = sales.data_points.get(i);
            let tokens = supply.data_points.get(i);
            let owner = owners.data_points.get(i);

            data_points::ActiveModel {
                collection_id: Set(collection_id),
                timestamp: Set(price.timestamp),
                avg_price: Set(price.avg),
                max_price: Set(price.max),
                min_price: Set(price.min),
                tokens_burned: Set(tokens.and_then(|t| as_count(t.burned))),
                tokens_minted: Set(tokens.and_then(|t| as_count(t.minted))),
                total_burned: Set(tokens.and_then(|t| as_count(t.total_burned))),
                total_minted: Set(tokens.and_then(|t| as_count(t.total_minted))),
                sales_count: Set(sale.and_then(|s| as_count(s.count))),
                sales_volume: Set(sale.and_then(|s| s.volume)),
                owners_count: Set(owner.and_then(|o| as_count(o.count))),
                ..Default::default()
            }
        })
        .collect()
}

fn as_count(value: Option<Decimal>) -> Option<i64> {
    value.and_then(|v| v.trunc().to_i64())
}
