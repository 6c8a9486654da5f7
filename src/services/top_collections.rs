//! Paged read of a ranking table, in the order the upstream feed returned.

use sea_orm::{
    ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::rank_tables::{RankMetric, TimeWindow};
use crate::entities::{prelude::*, rank_table_entries};
use crate::models::collections::{RankedCollectionRow, TopCollectionsResponse};
use crate::services::store::Store;

pub const PAGE_SIZE: u64 = 10;

pub async fn top_collections_page(
    store: &Store,
    metric: RankMetric,
    window: TimeWindow,
    page: u64,
) -> Result<TopCollectionsResponse, DbErr> {
    let Some(table) = store.find_rank_table(metric, window).await? else {
        return Ok(TopCollectionsResponse {
            collections: vec![],
            max: 0,
        });
    };

    let entries = RankTableEntries::find()
        .filter(rank_table_entries::Column::TableId.eq(table.id));

    let max = entries.clone().count(store.connection()).await?;

    let Some(offset) = page.checked_mul(PAGE_SIZE).filter(|offset| *offset < max) else {
        return Ok(TopCollectionsResponse {
            collections: vec![],
            max,
        });
    };

    let rows = entries
        .order_by_asc(rank_table_entries::Column::Position)
        .offset(offset)
        .limit(PAGE_SIZE)
        .find_also_related(Collections)
        .all(store.connection())
        .await?;

    let collections = rows
        .into_iter()
        .filter_map(|(entry, collection)| {
            collection.map(|c| RankedCollectionRow {
                id: c.id,
                address: c.address,
                name: c.name,
                image: c.image,
                floor: c.floor,
                value: entry.value,
            })
        })
        .collect();

    Ok(TopCollectionsResponse { collections, max })
}
