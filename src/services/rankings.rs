use std::collections::HashSet;

use sea_orm::{Iterable, Set};

use crate::entities::rank_table_entries;
use crate::entities::rank_tables::{RankMetric, TimeWindow};
use crate::error::SyncError;
use crate::models::mnemonic::RankedCollection;
use crate::services::collection_resolver::resolve_collection;
use crate::services::mnemonic::MarketDataSource;
use crate::services::store::{PendingOp, Store};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankRefreshOutcome {
    pub table_id: i32,
    pub entries: usize,
    pub skipped: usize,
    pub removed: u64,
}

/// Value recorded for a feed row: the first present field in the order
/// avgPrice, maxPrice, salesCount, salesVolume. Empty strings count as absent.
pub fn ranking_value(entry: &RankedCollection) -> Option<String> {
    [
        &entry.avg_price,
        &entry.max_price,
        &entry.sales_count,
        &entry.sales_volume,
    ]
    .into_iter()
    .flatten()
    .find(|value| !value.trim().is_empty())
    .cloned()
}

/// Rebuilds one ranking table from the upstream feed. The old entries are
/// deleted and the new ones written in the same batch, so readers never see
/// a half-built table.
pub async fn refresh_rank_table(
    store: &Store,
    market: &dyn MarketDataSource,
    metric: RankMetric,
    window: TimeWindow,
) -> Result<RankRefreshOutcome, SyncError> {
    let table = store.find_or_create_rank_table(metric, window).await?;
    let feed = market.top_collections(metric, window).await?;

    let mut ops = vec![PendingOp::ClearRankTable { table_id: table.id }];
    let mut ranked_ids = HashSet::new();
    let mut skipped = 0;

    for ranked in &feed.collections {
        // Every listed address is tracked, even when the row has no value
        let collection = match resolve_collection(store, market, &ranked.contract_address).await {
            Ok(collection) => collection,
            Err(err @ SyncError::ResolutionFailed { .. }) => {
                tracing::warn!("{}, skipping", err);
                skipped += 1;
                continue;
            }
            Err(err) => return Err(err),
        };

        let Some(value) = ranking_value(ranked) else {
            tracing::warn!(
                "No ranking value for {} in {:?}/{:?}, skipping",
                ranked.contract_address,
                metric,
                window
            );
            skipped += 1;
            continue;
        };

        if !ranked_ids.insert(collection.id) {
            tracing::debug!(
                "{} listed twice in {:?}/{:?}, keeping the first",
                collection.address,
                metric,
                window
            );
            skipped += 1;
            continue;
        }

        // ops[0] is the clear, so positions start at 1
        let position = ops.len() as i32;
        ops.push(PendingOp::UpsertRankEntry(rank_table_entries::ActiveModel {
            collection_id: Set(collection.id),
            table_id: Set(table.id),
            position: Set(position),
            value: Set(value),
            ..Default::default()
        }));
    }

    let entries = ops.len() - 1;
    let outcome = store.commit_batch(ops).await?;

    tracing::info!(
        table_id = table.id,
        entries,
        removed = outcome.rows_deleted,
        skipped,
        "Refreshed {:?} ranking over {:?}",
        metric,
        window
    );

    Ok(RankRefreshOutcome {
        table_id: table.id,
        entries,
        skipped,
        removed: outcome.rows_deleted,
    })
}

/// Refreshes every metric × window table in turn. Each table commits on its
/// own; an error stops the loop but keeps the tables already committed.
pub async fn refresh_all_rankings(
    store: &Store,
    market: &dyn MarketDataSource,
) -> Result<Vec<RankRefreshOutcome>, SyncError> {
    let mut outcomes = Vec::new();
    for metric in RankMetric::iter() {
        for window in TimeWindow::iter() {
            outcomes.push(refresh_rank_table(store, market, metric, window).await?);
        }
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(
        avg: Option<&str>,
        max: Option<&str>,
        count: Option<&str>,
        volume: Option<&str>,
    ) -> RankedCollection {
        RankedCollection {
            contract_address: "0xabc".to_string(),
            avg_price: avg.map(str::to_string),
            max_price: max.map(str::to_string),
            sales_count: count.map(str::to_string),
            sales_volume: volume.map(str::to_string),
        }
    }

    #[test]
    fn test_avg_price_has_priority() {
        let entry = ranked(Some("1.5"), Some("9"), Some("3"), Some("40"));
        assert_eq!(ranking_value(&entry), Some("1.5".to_string()));
    }

    #[test]
    fn test_falls_through_to_later_fields() {
        assert_eq!(
            ranking_value(&ranked(None, Some("9"), Some("3"), None)),
            Some("9".to_string())
        );
        assert_eq!(
            ranking_value(&ranked(None, None, Some("3"), Some("40"))),
            Some("3".to_string())
        );
        assert_eq!(
            ranking_value(&ranked(None, None, None, Some("40"))),
            Some("40".to_string())
        );
    }

    #[test]
    fn test_empty_string_counts_as_absent() {
        assert_eq!(
            ranking_value(&ranked(Some(""), None, Some("7"), None)),
            Some("7".to_string())
        );
    }

    #[test]
    fn test_zero_is_a_value() {
        assert_eq!(
            ranking_value(&ranked(Some("0"), Some("9"), None, None)),
            Some("0".to_string())
        );
    }

    #[test]
    fn test_no_value() {
        assert_eq!(ranking_value(&ranked(None, None, None, None)), None);
    }
}
