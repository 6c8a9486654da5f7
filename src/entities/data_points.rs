//! `SeaORM` Entity for per-collection market time series

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One sample per (collection, timestamp). The four upstream feeds can be
/// misaligned, so every metric is nullable.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "data_points")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub collection_id: i32,
    pub timestamp: DateTimeUtc,
    pub avg_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_price: Option<Decimal>,
    /// Interval deltas
    pub tokens_burned: Option<i64>,
    pub tokens_minted: Option<i64>,
    /// Cumulative totals
    pub total_burned: Option<i64>,
    pub total_minted: Option<i64>,
    pub sales_count: Option<i64>,
    pub sales_volume: Option<Decimal>,
    pub owners_count: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::collections::Entity",
        from = "Column::CollectionId",
        to = "super::collections::Column::Id",
        on_delete = "Cascade"
    )]
    Collections,
}

impl Related<super::collections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
