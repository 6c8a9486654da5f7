//! `SeaORM` Entity for ranking tables, one per (metric, time window)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Metric a ranking table orders collections by
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "camelCase")]
pub enum RankMetric {
    #[sea_orm(string_value = "avgPrice")]
    AvgPrice,
    #[sea_orm(string_value = "maxPrice")]
    MaxPrice,
    #[sea_orm(string_value = "salesCount")]
    SalesCount,
    #[sea_orm(string_value = "salesVolume")]
    SalesVolume,
}

/// Historical duration a ranking (or a time-series fetch) covers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "camelCase")]
pub enum TimeWindow {
    #[sea_orm(string_value = "oneDay")]
    OneDay,
    #[sea_orm(string_value = "sevenDays")]
    SevenDays,
    #[sea_orm(string_value = "thirtyDays")]
    ThirtyDays,
    #[sea_orm(string_value = "oneYear")]
    OneYear,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "rank_tables")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub rank_type: RankMetric,
    pub time_period: TimeWindow,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::rank_table_entries::Entity")]
    RankTableEntries,
}

impl Related<super::rank_table_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RankTableEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
